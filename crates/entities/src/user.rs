//! User entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A registered account. Owns chats, memories, and reminders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Email address, doubles as the username. Immutable after registration.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Short biography.
    pub bio: String,
    /// Location string.
    pub location: String,
    /// Job title or role.
    pub title: String,
    /// Profile photo URL.
    pub photo_url: String,
    /// Argon2 password hash. Never rendered to the wire.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Free-form settings object, replaced wholesale on update.
    pub settings: Value,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with empty profile fields and settings.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            bio: String::new(),
            location: String::new(),
            title: String::new(),
            photo_url: String::new(),
            password_hash: password_hash.into(),
            settings: Value::Object(serde_json::Map::new()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("test@example.com", "Test User", "hash");

        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, "Test User");
        assert!(user.bio.is_empty());
        assert_eq!(user.settings, serde_json::json!({}));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("test@example.com", "Test User", "secret-hash");
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "test@example.com");
    }
}
