//! Chat and chat message endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use data_store::DataStore;
use entities::{Chat, ChatMessage, MessageRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ValidJson;
use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

/// Request to create a chat.
#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Request to append a message to a chat.
#[derive(Debug, Deserialize)]
pub struct AppendMessageRequest {
    pub role: MessageRole,
    pub content: String,
}

/// Public view of a chat. The owner is implied by the credentials, so it
/// is not repeated in the body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub id: Uuid,
    pub title: String,
    pub last_message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            title: chat.title,
            last_message: chat.last_message,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        }
    }
}

/// Public view of a chat message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            chat_id: message.chat_id,
            role: message.role,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// Lists the authenticated user's chats, most recently updated first.
pub async fn list_chats<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<Vec<ChatResponse>>> {
    let chats = state.store.list_chats(auth_user.id).await?;
    Ok(Json(chats.into_iter().map(Into::into).collect()))
}

/// Creates a new chat.
pub async fn create_chat<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    ValidJson(request): ValidJson<CreateChatRequest>,
) -> ServerResult<(StatusCode, Json<ChatResponse>)> {
    let title = request.title.filter(|t| !t.trim().is_empty());
    let chat = Chat::new(auth_user.id, title);

    let chat = state.store.create_chat(chat).await?;
    tracing::debug!(chat_id = %chat.id, "Created chat");

    Ok((StatusCode::CREATED, Json(chat.into())))
}

/// Returns a single chat.
pub async fn get_chat<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(chat_id): Path<Uuid>,
) -> ServerResult<Json<ChatResponse>> {
    let chat = state
        .store
        .get_chat(auth_user.id, chat_id)
        .await?
        .ok_or(ServerError::NotFound("Chat"))?;

    Ok(Json(chat.into()))
}

/// Deletes a chat and all of its messages.
pub async fn delete_chat<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(chat_id): Path<Uuid>,
) -> ServerResult<StatusCode> {
    state.store.delete_chat(auth_user.id, chat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists a chat's messages in creation order.
pub async fn list_messages<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(chat_id): Path<Uuid>,
) -> ServerResult<Json<Vec<MessageResponse>>> {
    let messages = state.store.list_messages(auth_user.id, chat_id).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Appends a message to a chat.
pub async fn append_message<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(chat_id): Path<Uuid>,
    ValidJson(request): ValidJson<AppendMessageRequest>,
) -> ServerResult<(StatusCode, Json<MessageResponse>)> {
    if request.content.is_empty() {
        return Err(ServerError::validation(
            "content",
            "This field may not be blank.",
        ));
    }

    let message = state
        .store
        .append_message(auth_user.id, chat_id, request.role, request.content)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}
