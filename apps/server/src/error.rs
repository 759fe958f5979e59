//! Server error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_store::DataStoreError;
use serde_json::json;

/// Machine-readable error codes returned in response bodies.
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const AUTHENTICATION_REQUIRED: &str = "authentication_required";
    pub const INVALID_CREDENTIALS: &str = "invalid_credentials";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A named field failed validation.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Resource not found (or owned by another user).
    #[error("{0} not found.")]
    NotFound(&'static str),

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Login failed. Deliberately undifferentiated so callers cannot
    /// probe which emails are registered.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Creates a field-level validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<DataStoreError> for ServerError {
    fn from(e: DataStoreError) -> Self {
        match e {
            DataStoreError::NotFound { entity_type, .. } => ServerError::NotFound(entity_type),
            DataStoreError::AlreadyExists { entity_type, id } => {
                ServerError::InvalidRequest(format!("{entity_type} already exists: {id}"))
            }
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, msg.clone())
            }
            ServerError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, self.to_string())
            }
            ServerError::NotFound(_) => {
                (StatusCode::NOT_FOUND, error_codes::NOT_FOUND, self.to_string())
            }
            ServerError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTHENTICATION_REQUIRED,
                "Authentication required".to_string(),
            ),
            ServerError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                error_codes::INVALID_CREDENTIALS,
                self.to_string(),
            ),
            ServerError::Auth(e) => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTHENTICATION_REQUIRED,
                e.to_string(),
            ),
            ServerError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    // Do not leak internals to the client.
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
