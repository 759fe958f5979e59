//! SQLite data store implementation backed by sqlx.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{Chat, ChatMessage, Memory, MemoryCategory, MessageRole, Reminder, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{DataStore, DataStoreError, DataStoreResult};

/// SQLite-backed data store.
///
/// UUIDs are stored as hyphenated TEXT, timestamps through sqlx's chrono
/// support, and the user settings object as a JSON string. Foreign keys
/// are enabled on every connection so chat deletion cascades to messages.
#[derive(Debug, Clone)]
pub struct SqliteDataStore {
    pool: SqlitePool,
}

impl SqliteDataStore {
    /// Connects to the given SQLite database URL and creates the schema
    /// if needed.
    pub async fn connect(url: &str) -> DataStoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory SQLite database exists per connection; cap the pool
        // at one connection so every query sees the same database.
        let max_connections = if url.contains(":memory:") || url.contains("mode=memory") {
            1
        } else {
            5
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> DataStoreResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                bio TEXT NOT NULL DEFAULT '',
                location TEXT NOT NULL DEFAULT '',
                title TEXT NOT NULL DEFAULT '',
                photo_url TEXT NOT NULL DEFAULT '',
                password_hash TEXT NOT NULL,
                settings TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chats (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                last_message TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chat_messages (
                id TEXT PRIMARY KEY,
                chat_id TEXT NOT NULL REFERENCES chats(id) ON DELETE CASCADE,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS memories (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                snippet TEXT NOT NULL DEFAULT '',
                kind TEXT NOT NULL,
                category TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reminders (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                text TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                due_date TEXT NOT NULL DEFAULT '',
                tag TEXT NOT NULL DEFAULT '',
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_messages_chat
             ON chat_messages(chat_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        tracing::debug!("SQLite schema initialized");
        Ok(())
    }
}

fn parse_uuid(s: &str) -> DataStoreResult<Uuid> {
    s.parse()
        .map_err(|_| DataStoreError::Other(format!("invalid UUID in database: {s}")))
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    bio: String,
    location: String,
    title: String,
    photo_url: String,
    password_hash: String,
    settings: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DataStoreError;

    fn try_from(row: UserRow) -> DataStoreResult<Self> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            email: row.email,
            name: row.name,
            bio: row.bio,
            location: row.location,
            title: row.title,
            photo_url: row.photo_url,
            password_hash: row.password_hash,
            settings: serde_json::from_str(&row.settings)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ChatRow {
    id: String,
    user_id: String,
    title: String,
    last_message: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ChatRow> for Chat {
    type Error = DataStoreError;

    fn try_from(row: ChatRow) -> DataStoreResult<Self> {
        Ok(Chat {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            title: row.title,
            last_message: row.last_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ChatMessageRow {
    id: String,
    chat_id: String,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChatMessageRow> for ChatMessage {
    type Error = DataStoreError;

    fn try_from(row: ChatMessageRow) -> DataStoreResult<Self> {
        let role = MessageRole::parse(&row.role)
            .ok_or_else(|| DataStoreError::Other(format!("invalid message role: {}", row.role)))?;
        Ok(ChatMessage {
            id: parse_uuid(&row.id)?,
            chat_id: parse_uuid(&row.chat_id)?,
            role,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MemoryRow {
    id: String,
    user_id: String,
    title: String,
    snippet: String,
    kind: String,
    category: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MemoryRow> for Memory {
    type Error = DataStoreError;

    fn try_from(row: MemoryRow) -> DataStoreResult<Self> {
        let category = MemoryCategory::parse(&row.category).ok_or_else(|| {
            DataStoreError::Other(format!("invalid memory category: {}", row.category))
        })?;
        Ok(Memory {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            title: row.title,
            snippet: row.snippet,
            kind: row.kind,
            category,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReminderRow {
    id: String,
    user_id: String,
    text: String,
    completed: bool,
    due_date: String,
    tag: String,
    notes: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReminderRow> for Reminder {
    type Error = DataStoreError;

    fn try_from(row: ReminderRow) -> DataStoreResult<Self> {
        Ok(Reminder {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            text: row.text,
            completed: row.completed,
            due_date: row.due_date,
            tag: row.tag,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl DataStore for SqliteDataStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> DataStoreResult<User> {
        let settings = serde_json::to_string(&user.settings)?;
        let result = sqlx::query(
            "INSERT INTO users (id, email, name, bio, location, title, photo_url,
                                password_hash, settings, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(&user.title)
        .bind(&user.photo_url)
        .bind(&user.password_hash)
        .bind(settings)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(e))
                if e.kind() == sqlx::error::ErrorKind::UniqueViolation =>
            {
                Err(DataStoreError::already_exists("User", user.email.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, id: Uuid) -> DataStoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> DataStoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn update_user(&self, user: User) -> DataStoreResult<User> {
        let settings = serde_json::to_string(&user.settings)?;
        let result = sqlx::query(
            "UPDATE users
             SET name = ?1, bio = ?2, location = ?3, title = ?4, photo_url = ?5,
                 settings = ?6, updated_at = ?7
             WHERE id = ?8",
        )
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(&user.title)
        .bind(&user.photo_url)
        .bind(settings)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataStoreError::not_found("User", user.id.to_string()));
        }
        Ok(user)
    }

    // =========================================================================
    // Chat operations
    // =========================================================================

    async fn create_chat(&self, chat: Chat) -> DataStoreResult<Chat> {
        sqlx::query(
            "INSERT INTO chats (id, user_id, title, last_message, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(chat.id.to_string())
        .bind(chat.user_id.to_string())
        .bind(&chat.title)
        .bind(&chat.last_message)
        .bind(chat.created_at)
        .bind(chat.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(chat)
    }

    async fn get_chat(&self, owner: Uuid, id: Uuid) -> DataStoreResult<Option<Chat>> {
        let row =
            sqlx::query_as::<_, ChatRow>("SELECT * FROM chats WHERE id = ?1 AND user_id = ?2")
                .bind(id.to_string())
                .bind(owner.to_string())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Chat::try_from).transpose()
    }

    async fn list_chats(&self, owner: Uuid) -> DataStoreResult<Vec<Chat>> {
        let rows = sqlx::query_as::<_, ChatRow>(
            "SELECT * FROM chats WHERE user_id = ?1 ORDER BY updated_at DESC",
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Chat::try_from).collect()
    }

    async fn delete_chat(&self, owner: Uuid, id: Uuid) -> DataStoreResult<()> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ?1 AND user_id = ?2")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DataStoreError::not_found("Chat", id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Chat message operations
    // =========================================================================

    async fn list_messages(
        &self,
        owner: Uuid,
        chat_id: Uuid,
    ) -> DataStoreResult<Vec<ChatMessage>> {
        if self.get_chat(owner, chat_id).await?.is_none() {
            return Err(DataStoreError::not_found("Chat", chat_id.to_string()));
        }

        let rows = sqlx::query_as::<_, ChatMessageRow>(
            "SELECT * FROM chat_messages WHERE chat_id = ?1 ORDER BY created_at ASC",
        )
        .bind(chat_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ChatMessage::try_from).collect()
    }

    async fn append_message(
        &self,
        owner: Uuid,
        chat_id: Uuid,
        role: MessageRole,
        content: String,
    ) -> DataStoreResult<ChatMessage> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<(String,)> =
            sqlx::query_as("SELECT id FROM chats WHERE id = ?1 AND user_id = ?2")
                .bind(chat_id.to_string())
                .bind(owner.to_string())
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Err(DataStoreError::not_found("Chat", chat_id.to_string()));
        }

        let message = ChatMessage::new(chat_id, role, content);

        sqlx::query(
            "INSERT INTO chat_messages (id, chat_id, role, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(message.id.to_string())
        .bind(message.chat_id.to_string())
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE chats SET last_message = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(&message.content)
            .bind(Utc::now())
            .bind(chat_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    // =========================================================================
    // Memory operations
    // =========================================================================

    async fn create_memory(&self, memory: Memory) -> DataStoreResult<Memory> {
        sqlx::query(
            "INSERT INTO memories (id, user_id, title, snippet, kind, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(memory.id.to_string())
        .bind(memory.user_id.to_string())
        .bind(&memory.title)
        .bind(&memory.snippet)
        .bind(&memory.kind)
        .bind(memory.category.as_str())
        .bind(memory.created_at)
        .execute(&self.pool)
        .await?;
        Ok(memory)
    }

    async fn list_memories(&self, owner: Uuid) -> DataStoreResult<Vec<Memory>> {
        let rows = sqlx::query_as::<_, MemoryRow>(
            "SELECT * FROM memories WHERE user_id = ?1 ORDER BY created_at DESC",
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Memory::try_from).collect()
    }

    async fn delete_memory(&self, owner: Uuid, id: Uuid) -> DataStoreResult<()> {
        let result = sqlx::query("DELETE FROM memories WHERE id = ?1 AND user_id = ?2")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DataStoreError::not_found("Memory", id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Reminder operations
    // =========================================================================

    async fn create_reminder(&self, reminder: Reminder) -> DataStoreResult<Reminder> {
        sqlx::query(
            "INSERT INTO reminders (id, user_id, text, completed, due_date, tag, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(reminder.id.to_string())
        .bind(reminder.user_id.to_string())
        .bind(&reminder.text)
        .bind(reminder.completed)
        .bind(&reminder.due_date)
        .bind(&reminder.tag)
        .bind(&reminder.notes)
        .bind(reminder.created_at)
        .execute(&self.pool)
        .await?;
        Ok(reminder)
    }

    async fn get_reminder(&self, owner: Uuid, id: Uuid) -> DataStoreResult<Option<Reminder>> {
        let row = sqlx::query_as::<_, ReminderRow>(
            "SELECT * FROM reminders WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id.to_string())
        .bind(owner.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Reminder::try_from).transpose()
    }

    async fn list_reminders(&self, owner: Uuid) -> DataStoreResult<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderRow>(
            "SELECT * FROM reminders WHERE user_id = ?1 ORDER BY created_at DESC",
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Reminder::try_from).collect()
    }

    async fn update_reminder(&self, owner: Uuid, reminder: Reminder) -> DataStoreResult<Reminder> {
        let result = sqlx::query(
            "UPDATE reminders
             SET text = ?1, completed = ?2, due_date = ?3, tag = ?4, notes = ?5
             WHERE id = ?6 AND user_id = ?7",
        )
        .bind(&reminder.text)
        .bind(reminder.completed)
        .bind(&reminder.due_date)
        .bind(&reminder.tag)
        .bind(&reminder.notes)
        .bind(reminder.id.to_string())
        .bind(owner.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DataStoreError::not_found("Reminder", reminder.id.to_string()));
        }
        Ok(reminder)
    }

    async fn delete_reminder(&self, owner: Uuid, id: Uuid) -> DataStoreResult<()> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = ?1 AND user_id = ?2")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DataStoreError::not_found("Reminder", id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteDataStore {
        SqliteDataStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_user_round_trip() {
        let store = test_store().await;
        let mut user = User::new("a@example.com", "Alice", "hash");
        user.settings = serde_json::json!({"theme": "dark"});

        let created = store.create_user(user.clone()).await.unwrap();
        assert_eq!(created.id, user.id);

        let fetched = store.get_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Alice");
        assert_eq!(fetched.settings, serde_json::json!({"theme": "dark"}));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let store = test_store().await;
        store
            .create_user(User::new("a@example.com", "Alice", "hash"))
            .await
            .unwrap();

        let result = store
            .create_user(User::new("a@example.com", "Impostor", "hash"))
            .await;
        assert!(matches!(result, Err(DataStoreError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_append_message_and_cascade_delete() {
        let store = test_store().await;
        let owner = store
            .create_user(User::new("a@example.com", "Alice", "hash"))
            .await
            .unwrap();
        let chat = store.create_chat(Chat::new(owner.id, None)).await.unwrap();

        let message = store
            .append_message(owner.id, chat.id, MessageRole::User, "hello".to_string())
            .await
            .unwrap();

        let fetched = store.get_chat(owner.id, chat.id).await.unwrap().unwrap();
        assert_eq!(fetched.last_message, "hello");
        assert!(fetched.updated_at > chat.updated_at);

        let messages = store.list_messages(owner.id, chat.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, message.id);

        store.delete_chat(owner.id, chat.id).await.unwrap();
        assert!(matches!(
            store.list_messages(owner.id, chat.id).await,
            Err(DataStoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_ownership_filter() {
        let store = test_store().await;
        let alice = store
            .create_user(User::new("alice@example.com", "Alice", "hash"))
            .await
            .unwrap();
        let bob = store
            .create_user(User::new("bob@example.com", "Bob", "hash"))
            .await
            .unwrap();

        let reminder = store
            .create_reminder(Reminder::new(alice.id, "water plants"))
            .await
            .unwrap();

        assert!(store.get_reminder(bob.id, reminder.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_reminder(bob.id, reminder.id).await,
            Err(DataStoreError::NotFound { .. })
        ));
        assert!(store.get_reminder(alice.id, reminder.id).await.unwrap().is_some());
    }
}
