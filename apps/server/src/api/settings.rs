//! User settings endpoints.
//!
//! Settings are a free-form JSON object owned by the client; the server
//! stores them opaquely and replaces them wholesale on update.

use axum::{extract::State, Extension, Json};
use data_store::DataStore;
use serde_json::Value;

use crate::api::ValidJson;
use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

/// Upper bound on the serialized settings document.
const MAX_SETTINGS_BYTES: usize = 64 * 1024;

/// Returns the authenticated user's settings object.
pub async fn get_settings<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<Value>> {
    let user = state
        .store
        .get_user(auth_user.id)
        .await?
        .ok_or(ServerError::NotFound("User"))?;

    Ok(Json(user.settings))
}

/// Replaces the authenticated user's settings object.
///
/// Full replacement, not a merge: keys absent from the request body are
/// dropped from the stored document.
pub async fn replace_settings<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    ValidJson(settings): ValidJson<Value>,
) -> ServerResult<Json<Value>> {
    if !settings.is_object() {
        return Err(ServerError::validation(
            "settings",
            "Settings must be a JSON object.",
        ));
    }

    let serialized = serde_json::to_string(&settings)
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    if serialized.len() > MAX_SETTINGS_BYTES {
        return Err(ServerError::validation(
            "settings",
            format!("Settings may not exceed {MAX_SETTINGS_BYTES} bytes."),
        ));
    }

    let mut user = state
        .store
        .get_user(auth_user.id)
        .await?
        .ok_or(ServerError::NotFound("User"))?;

    user.settings = settings;
    user.updated_at = chrono::Utc::now();

    let user = state.store.update_user(user).await?;
    Ok(Json(user.settings))
}
