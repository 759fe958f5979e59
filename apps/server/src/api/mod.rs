//! API endpoints.

pub mod auth;
pub mod chat;
pub mod memory;
pub mod reminder;
pub mod settings;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use data_store::DataStore;
use serde::de::DeserializeOwned;

use crate::error::ServerError;
use crate::middleware::auth_middleware;
use crate::state::SharedState;

/// JSON body extractor whose rejections surface as 400 validation errors
/// instead of axum's default status codes.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServerError::InvalidRequest(rejection.body_text())),
        }
    }
}

/// Creates the API router with all endpoints.
pub fn create_router<S: DataStore + 'static>(state: SharedState<S>) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/password-reset", post(auth::password_reset))
        .route("/health", get(health_check));

    let protected = Router::new()
        // Account endpoints
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me).put(auth::update_me))
        .route(
            "/settings",
            get(settings::get_settings).put(settings::replace_settings),
        )
        // Chat endpoints
        .route("/chats", get(chat::list_chats).post(chat::create_chat))
        .route("/chats/:chat_id", get(chat::get_chat).delete(chat::delete_chat))
        .route(
            "/chats/:chat_id/messages",
            get(chat::list_messages).post(chat::append_message),
        )
        // Memory endpoints
        .route("/memories", get(memory::list_memories).post(memory::create_memory))
        .route("/memories/:memory_id", delete(memory::delete_memory))
        // Reminder endpoints
        .route(
            "/reminders",
            get(reminder::list_reminders).post(reminder::create_reminder),
        )
        .route(
            "/reminders/:reminder_id",
            put(reminder::update_reminder).delete(reminder::delete_reminder),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    public.merge(protected).with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
