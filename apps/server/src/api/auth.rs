//! Account endpoints: registration, login, logout, and profile.

use auth::{hash_password, verify_password, Session, MIN_PASSWORD_LENGTH};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use data_store::{DataStore, DataStoreError};
use entities::User;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::ValidJson;
use crate::error::{ServerError, ServerResult};
use crate::middleware::{extract_session_token, AuthenticatedUser, SESSION_COOKIE};
use crate::state::SharedState;

/// Request to register a new account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Request to log in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to update the authenticated user's profile. Absent fields are
/// left unchanged; the email address is immutable.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub photo_url: Option<String>,
}

/// Public view of a user. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub bio: String,
    pub location: String,
    pub title: String,
    pub photo_url: String,
    pub settings: serde_json::Value,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            bio: user.bio,
            location: user.location,
            title: user.title,
            photo_url: user.photo_url,
            settings: user.settings,
        }
    }
}

/// Response to a successful registration or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Minimal structural check: a non-empty local part and a domain with a
/// dot is enough for a local-first assistant.
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && domain.len() >= 3,
        None => false,
    }
}

fn validate_password(password: &str) -> ServerResult<()> {
    if password.is_empty() {
        return Err(ServerError::validation(
            "password",
            "This field may not be blank.",
        ));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ServerError::validation(
            "password",
            format!("Ensure this field has at least {MIN_PASSWORD_LENGTH} characters."),
        ));
    }
    Ok(())
}

fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
}

/// Mints both credentials for a freshly authenticated user: a bearer JWT
/// and a server-side session behind a cookie.
async fn issue_credentials<S: DataStore>(
    state: &SharedState<S>,
    user: &User,
) -> ServerResult<(String, String)> {
    let token = state
        .jwt
        .generate_token(user.id, user.email.clone())
        .map_err(|e| ServerError::Internal(format!("Failed to generate token: {e}")))?;

    let session = Session::new(user.id);
    let cookie = session_cookie(&session.token);
    state.sessions.write().await.store(session);

    Ok((token, cookie))
}

/// Registers a new account and logs it in.
pub async fn register<S: DataStore>(
    State(state): State<SharedState<S>>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> ServerResult<impl IntoResponse> {
    let email = request.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ServerError::validation(
            "email",
            "Enter a valid email address.",
        ));
    }
    validate_password(&request.password)?;

    let password_hash = hash_password(&request.password)?;
    let name = request.name.unwrap_or_default().trim().to_string();
    let user = User::new(email, name, password_hash);

    let user = match state.store.create_user(user).await {
        Ok(user) => user,
        Err(DataStoreError::AlreadyExists { .. }) => {
            return Err(ServerError::validation(
                "email",
                "A user with this email already exists.",
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let (token, cookie) = issue_credentials(&state, &user).await?;
    tracing::info!(user_id = %user.id, "Registered new user");

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Logs an existing account in.
pub async fn login<S: DataStore>(
    State(state): State<SharedState<S>>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> ServerResult<impl IntoResponse> {
    let email = request.email.trim().to_lowercase();

    let user = state
        .store
        .get_user_by_email(&email)
        .await?
        .ok_or(ServerError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(ServerError::InvalidCredentials);
    }

    let (token, cookie) = issue_credentials(&state, &user).await?;
    tracing::debug!(user_id = %user.id, "User logged in");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Logs out the current session.
///
/// Only the server-side session is discarded; an already-issued JWT stays
/// valid until it expires.
pub async fn logout<S: DataStore>(
    State(state): State<SharedState<S>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = extract_session_token(&headers) {
        state.sessions.write().await.remove(&token);
    }

    (StatusCode::NO_CONTENT, [(SET_COOKIE, clear_session_cookie())])
}

/// Returns the authenticated user's profile.
pub async fn me<S: DataStore>(
    State(state): State<SharedState<S>>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
) -> ServerResult<Json<UserResponse>> {
    let user = state
        .store
        .get_user(auth_user.id)
        .await?
        .ok_or(ServerError::NotFound("User"))?;

    Ok(Json(user.into()))
}

/// Updates the authenticated user's profile.
pub async fn update_me<S: DataStore>(
    State(state): State<SharedState<S>>,
    axum::Extension(auth_user): axum::Extension<AuthenticatedUser>,
    ValidJson(request): ValidJson<UpdateProfileRequest>,
) -> ServerResult<Json<UserResponse>> {
    let mut user = state
        .store
        .get_user(auth_user.id)
        .await?
        .ok_or(ServerError::NotFound("User"))?;

    if let Some(name) = request.name {
        user.name = name;
    }
    if let Some(bio) = request.bio {
        user.bio = bio;
    }
    if let Some(location) = request.location {
        user.location = location;
    }
    if let Some(title) = request.title {
        user.title = title;
    }
    if let Some(photo_url) = request.photo_url {
        user.photo_url = photo_url;
    }
    user.updated_at = chrono::Utc::now();

    let user = state.store.update_user(user).await?;
    Ok(Json(user.into()))
}

/// Password reset placeholder. Accounts are local, so there is no mail
/// channel to deliver a reset link over.
pub async fn password_reset() -> Json<serde_json::Value> {
    Json(json!({
        "detail": "Password reset is not available in local mode."
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));

        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_session_cookie_format() {
        let cookie = session_cookie("tok123");
        assert!(cookie.starts_with("aide_session=tok123;"));
        assert!(cookie.contains("HttpOnly"));

        let cleared = clear_session_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }
}
