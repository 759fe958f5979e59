//! Reminder entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reminder owned by one user.
///
/// `completed` is a plain two-state flag: either state may be set to the
/// other at any time via partial update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Reminder text.
    pub text: String,
    /// Whether the reminder has been completed.
    pub completed: bool,
    /// Free-text due-date label (e.g. "tomorrow", "Fri 5pm").
    pub due_date: String,
    /// Free-text tag.
    pub tag: String,
    /// Additional notes.
    pub notes: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Creates a new pending reminder.
    pub fn new(user_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            text: text.into(),
            completed: false,
            due_date: String::new(),
            tag: String::new(),
            notes: String::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_defaults() {
        let reminder = Reminder::new(Uuid::new_v4(), "Buy milk");

        assert_eq!(reminder.text, "Buy milk");
        assert!(!reminder.completed);
        assert!(reminder.due_date.is_empty());
        assert!(reminder.tag.is_empty());
        assert!(reminder.notes.is_empty());
    }
}
