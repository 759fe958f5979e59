//! Authentication middleware.

use std::sync::Arc;

use auth::Claims;
use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use data_store::DataStore;
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "aide_session";

/// Authenticated user information.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = auth::AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.user_id()?,
            email: claims.email,
        })
    }
}

/// Extracts the JWT token from the Authorization header.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Extracts the session token from the Cookie header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            pair.strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .map(str::to_string)
}

/// Authentication middleware.
///
/// Accepts either a bearer JWT in the Authorization header or a session
/// cookie, interchangeably. On success the resolved [`AuthenticatedUser`]
/// is stored in the request extensions; otherwise the request is rejected
/// with 401.
pub async fn auth_middleware<S: DataStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Bearer token takes precedence when both credentials are present.
    if let Some(token) = extract_bearer_token(request.headers()).map(str::to_string) {
        let user = state
            .jwt
            .validate_token(&token)
            .and_then(AuthenticatedUser::try_from);
        return match user {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token rejected");
                ServerError::AuthenticationRequired.into_response()
            }
        };
    }

    if let Some(token) = extract_session_token(request.headers()) {
        let user_id = state.sessions.read().await.resolve(&token);
        let Some(user_id) = user_id else {
            tracing::debug!("Unknown session token");
            return ServerError::AuthenticationRequired.into_response();
        };

        return match state.store.get_user(user_id).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(AuthenticatedUser {
                    id: user.id,
                    email: user.email,
                });
                next.run(request).await
            }
            Ok(None) => ServerError::AuthenticationRequired.into_response(),
            Err(e) => ServerError::Internal(e.to_string()).into_response(),
        };
    }

    ServerError::AuthenticationRequired.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(name: axum::http::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_authenticated_user_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "test@example.com".to_string(), 24);

        let user = AuthenticatedUser::try_from(claims).unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.email, "test@example.com");
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers_with(AUTHORIZATION, "Bearer test-token-123");
        assert_eq!(extract_bearer_token(&headers), Some("test-token-123"));

        let headers = headers_with(AUTHORIZATION, "Basic credentials");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_extract_session_token() {
        let headers = headers_with(COOKIE, "other=1; aide_session=abc123; theme=dark");
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));

        let headers = headers_with(COOKIE, "aide_session_old=zzz");
        assert_eq!(extract_session_token(&headers), None);
    }
}
