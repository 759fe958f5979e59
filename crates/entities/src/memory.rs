//! Memory entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type label given to a memory when none is supplied.
pub const DEFAULT_MEMORY_KIND: &str = "Note";

/// Category of a memory. Closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryCategory {
    /// Extracted from conversations.
    #[default]
    Conversations,
    /// Extracted from documents.
    Documents,
    /// Daily briefing digests.
    DailyBriefings,
    /// Marked important by the user.
    Important,
}

impl MemoryCategory {
    /// Returns the wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conversations => "conversations",
            Self::Documents => "documents",
            Self::DailyBriefings => "daily-briefings",
            Self::Important => "important",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "conversations" => Some(Self::Conversations),
            "documents" => Some(Self::Documents),
            "daily-briefings" => Some(Self::DailyBriefings),
            "important" => Some(Self::Important),
            _ => None,
        }
    }
}

/// A remembered note owned by one user. Created and deleted, never
/// updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Short title.
    pub title: String,
    /// Body excerpt.
    pub snippet: String,
    /// Free-text type label.
    #[serde(rename = "type")]
    pub kind: String,
    /// Category within the closed enumeration.
    pub category: MemoryCategory,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Memory {
    /// Creates a new memory, applying defaults for omitted fields.
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        snippet: Option<String>,
        kind: Option<String>,
        category: Option<MemoryCategory>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            snippet: snippet.unwrap_or_default(),
            kind: kind.unwrap_or_else(|| DEFAULT_MEMORY_KIND.to_string()),
            category: category.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_defaults() {
        let memory = Memory::new(Uuid::new_v4(), "Allergy info", None, None, None);

        assert_eq!(memory.snippet, "");
        assert_eq!(memory.kind, DEFAULT_MEMORY_KIND);
        assert_eq!(memory.category, MemoryCategory::Conversations);
    }

    #[test]
    fn test_category_wire_format() {
        let json = serde_json::to_string(&MemoryCategory::DailyBriefings).unwrap();
        assert_eq!(json, "\"daily-briefings\"");

        let parsed: MemoryCategory = serde_json::from_str("\"important\"").unwrap();
        assert_eq!(parsed, MemoryCategory::Important);

        assert!(serde_json::from_str::<MemoryCategory>("\"secrets\"").is_err());
    }

    #[test]
    fn test_category_storage_round_trip() {
        for category in [
            MemoryCategory::Conversations,
            MemoryCategory::Documents,
            MemoryCategory::DailyBriefings,
            MemoryCategory::Important,
        ] {
            assert_eq!(MemoryCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_kind_serialized_as_type() {
        let memory = Memory::new(Uuid::new_v4(), "Note", None, None, None);
        let json = serde_json::to_value(&memory).unwrap();

        assert_eq!(json["type"], "Note");
        assert!(json.get("kind").is_none());
    }
}
