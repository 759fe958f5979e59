//! Reminder endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use data_store::DataStore;
use entities::Reminder;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::ValidJson;
use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

/// Request to create a reminder.
#[derive(Debug, Deserialize)]
pub struct CreateReminderRequest {
    pub text: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to partially update a reminder. Absent fields are left
/// unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateReminderRequest {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<String>,
    pub tag: Option<String>,
    pub notes: Option<String>,
}

/// Lists the authenticated user's reminders, newest first.
pub async fn list_reminders<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<Vec<Reminder>>> {
    let reminders = state.store.list_reminders(auth_user.id).await?;
    Ok(Json(reminders))
}

/// Creates a new reminder.
pub async fn create_reminder<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    ValidJson(request): ValidJson<CreateReminderRequest>,
) -> ServerResult<(StatusCode, Json<Reminder>)> {
    if request.text.trim().is_empty() {
        return Err(ServerError::validation(
            "text",
            "This field may not be blank.",
        ));
    }

    let mut reminder = Reminder::new(auth_user.id, request.text);
    if let Some(due_date) = request.due_date {
        reminder.due_date = due_date;
    }
    if let Some(tag) = request.tag {
        reminder.tag = tag;
    }
    if let Some(notes) = request.notes {
        reminder.notes = notes;
    }

    let reminder = state.store.create_reminder(reminder).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

/// Partially updates a reminder.
pub async fn update_reminder<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(reminder_id): Path<Uuid>,
    ValidJson(request): ValidJson<UpdateReminderRequest>,
) -> ServerResult<Json<Reminder>> {
    let mut reminder = state
        .store
        .get_reminder(auth_user.id, reminder_id)
        .await?
        .ok_or(ServerError::NotFound("Reminder"))?;

    if let Some(text) = request.text {
        if text.trim().is_empty() {
            return Err(ServerError::validation(
                "text",
                "This field may not be blank.",
            ));
        }
        reminder.text = text;
    }
    if let Some(completed) = request.completed {
        reminder.completed = completed;
    }
    if let Some(due_date) = request.due_date {
        reminder.due_date = due_date;
    }
    if let Some(tag) = request.tag {
        reminder.tag = tag;
    }
    if let Some(notes) = request.notes {
        reminder.notes = notes;
    }

    let reminder = state.store.update_reminder(auth_user.id, reminder).await?;
    Ok(Json(reminder))
}

/// Deletes a reminder.
pub async fn delete_reminder<S: DataStore>(
    State(state): State<SharedState<S>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(reminder_id): Path<Uuid>,
) -> ServerResult<StatusCode> {
    state.store.delete_reminder(auth_user.id, reminder_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
