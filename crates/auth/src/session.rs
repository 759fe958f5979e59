//! Server-side sessions for cookie-based authentication.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// A server-side session tied to one user.
///
/// The token is an opaque random value delivered to the client as a
/// cookie; it carries no claims and is only meaningful while the server
/// holds the session. Logout drops the session, which is what makes
/// session credentials revocable (unlike JWTs).
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session token.
    pub token: String,
    /// The authenticated user.
    pub user_id: Uuid,
    /// When the session was established.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session with a fresh random token.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            token: generate_session_token(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Generates a cryptographically random session token.
pub fn generate_session_token() -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.random::<u8>()).collect();
    URL_SAFE_NO_PAD.encode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_tokens_are_unique() {
        let user_id = Uuid::new_v4();
        let session1 = Session::new(user_id);
        let session2 = Session::new(user_id);

        assert_ne!(session1.token, session2.token);
        assert!(!session1.token.is_empty());
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = generate_session_token();

        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
