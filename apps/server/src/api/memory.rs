//! Memory endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use data_store::DataStore;
use entities::{Memory, MemoryCategory};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::ValidJson;
use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

/// Request to create a memory. Unknown categories are rejected by the
/// closed [`MemoryCategory`] enumeration during deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateMemoryRequest {
    pub title: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub category: Option<MemoryCategory>,
}

/// Lists the authenticated user's memories, newest first.
pub async fn list_memories<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<Vec<Memory>>> {
    let memories = state.store.list_memories(auth_user.id).await?;
    Ok(Json(memories))
}

/// Creates a new memory.
pub async fn create_memory<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    ValidJson(request): ValidJson<CreateMemoryRequest>,
) -> ServerResult<(StatusCode, Json<Memory>)> {
    if request.title.trim().is_empty() {
        return Err(ServerError::validation(
            "title",
            "This field may not be blank.",
        ));
    }

    let memory = Memory::new(
        auth_user.id,
        request.title,
        request.snippet,
        request.kind,
        request.category,
    );

    let memory = state.store.create_memory(memory).await?;
    Ok((StatusCode::CREATED, Json(memory)))
}

/// Deletes a memory.
pub async fn delete_memory<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(memory_id): Path<Uuid>,
) -> ServerResult<StatusCode> {
    state.store.delete_memory(auth_user.id, memory_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
