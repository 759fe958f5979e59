//! Request middleware.

pub mod auth;

pub use auth::{auth_middleware, extract_session_token, AuthenticatedUser, SESSION_COOKIE};
