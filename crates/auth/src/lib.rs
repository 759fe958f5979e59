//! Authentication primitives for Aide.
//!
//! This crate provides:
//! - JWT access token generation and validation
//! - Argon2 password hashing and verification
//! - Opaque session tokens for cookie-based authentication

mod error;
mod jwt;
mod password;
mod session;

pub use error::*;
pub use jwt::*;
pub use password::*;
pub use session::*;

/// Default JWT expiration time in hours.
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 24;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "aide";

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;
