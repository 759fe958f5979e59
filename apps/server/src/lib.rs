//! Personal assistant backend server.
//!
//! HTTP API for accounts, chats, memories, and reminders, generic over
//! the [`DataStore`] backing it.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use auth::{JwtConfig, JwtManager};
use axum::Router;
use data_store::DataStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::{ServerError, ServerResult};
pub use state::{create_shared_state, AppState, SharedState};

/// Creates the application router with CORS and request tracing.
pub fn create_app<S: DataStore + 'static>(state: SharedState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Creates shared application state from configuration and a store.
pub fn create_state<S: DataStore>(config: Config, store: S) -> SharedState<S> {
    let jwt = JwtManager::new(
        JwtConfig::new(config.jwt_secret.clone())
            .with_expiration_hours(config.jwt_expiration_hours),
    );
    create_shared_state(config, store, jwt)
}

/// Initializes tracing with the configured log level as the default
/// filter, overridable via `RUST_LOG`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
