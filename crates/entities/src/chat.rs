//! Chat and chat message entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to a chat when none is supplied.
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// The human user.
    User,
    /// The assistant.
    Ai,
}

impl MessageRole {
    /// Returns the wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "ai" => Some(Self::Ai),
            _ => None,
        }
    }
}

/// A conversation thread owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Chat title.
    pub title: String,
    /// Content of the most recently appended message, denormalized for
    /// list views.
    pub last_message: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated. Advances whenever a message
    /// is appended.
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Creates a new chat, defaulting the title when none is given.
    pub fn new(user_id: Uuid, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.unwrap_or_else(|| DEFAULT_CHAT_TITLE.to_string()),
            last_message: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Records an appended message: caches its content and bumps
    /// `updated_at`.
    pub fn record_message(&mut self, content: &str) {
        self.last_message = content.to_string();
        self.updated_at = Utc::now();
    }
}

/// A single message within a chat. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier.
    pub id: Uuid,
    /// Parent chat.
    pub chat_id: Uuid,
    /// Message author.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a new chat message.
    pub fn new(chat_id: Uuid, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_default_title() {
        let chat = Chat::new(Uuid::new_v4(), None);
        assert_eq!(chat.title, DEFAULT_CHAT_TITLE);

        let chat = Chat::new(Uuid::new_v4(), Some("Trip planning".to_string()));
        assert_eq!(chat.title, "Trip planning");
    }

    #[test]
    fn test_record_message_advances_updated_at() {
        let mut chat = Chat::new(Uuid::new_v4(), None);
        let before = chat.updated_at;

        chat.record_message("hello");

        assert_eq!(chat.last_message, "hello");
        assert!(chat.updated_at > before);
    }

    #[test]
    fn test_message_role_round_trip() {
        assert_eq!(MessageRole::parse("user"), Some(MessageRole::User));
        assert_eq!(MessageRole::parse("ai"), Some(MessageRole::Ai));
        assert_eq!(MessageRole::parse("system"), None);

        let json = serde_json::to_string(&MessageRole::Ai).unwrap();
        assert_eq!(json, "\"ai\"");
    }
}
