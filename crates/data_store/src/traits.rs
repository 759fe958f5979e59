//! Data store trait definitions.

use async_trait::async_trait;
use entities::{Chat, ChatMessage, Memory, MessageRole, Reminder, User};
use uuid::Uuid;

use crate::DataStoreResult;

/// Trait for owner-scoped resource storage.
///
/// Every method that touches a chat, message, memory, or reminder takes
/// the owner's user ID as a mandatory parameter and must filter by it. A
/// resource that exists but belongs to another user is reported as absent
/// (`Ok(None)` or [`crate::DataStoreError::NotFound`]), never as a
/// distinct permission failure — callers cannot learn that a foreign row
/// exists.
#[async_trait]
pub trait DataStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user. Fails with `AlreadyExists` when the email is
    /// already registered.
    async fn create_user(&self, user: User) -> DataStoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> DataStoreResult<Option<User>>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> DataStoreResult<Option<User>>;

    /// Updates a user's profile fields and settings.
    async fn update_user(&self, user: User) -> DataStoreResult<User>;

    // =========================================================================
    // Chat operations
    // =========================================================================

    /// Creates a new chat.
    async fn create_chat(&self, chat: Chat) -> DataStoreResult<Chat>;

    /// Gets a chat by ID, scoped to its owner.
    async fn get_chat(&self, owner: Uuid, id: Uuid) -> DataStoreResult<Option<Chat>>;

    /// Lists the owner's chats, most recently updated first.
    async fn list_chats(&self, owner: Uuid) -> DataStoreResult<Vec<Chat>>;

    /// Deletes a chat and all of its messages.
    async fn delete_chat(&self, owner: Uuid, id: Uuid) -> DataStoreResult<()>;

    // =========================================================================
    // Chat message operations
    // =========================================================================

    /// Lists a chat's messages in creation order. Fails with `NotFound`
    /// when the chat is absent or foreign.
    async fn list_messages(&self, owner: Uuid, chat_id: Uuid)
        -> DataStoreResult<Vec<ChatMessage>>;

    /// Appends a message to a chat.
    ///
    /// Atomically persists the message, caches its content as the chat's
    /// `last_message`, and bumps the chat's `updated_at`. No intermediate
    /// state is observable by concurrent readers.
    async fn append_message(
        &self,
        owner: Uuid,
        chat_id: Uuid,
        role: MessageRole,
        content: String,
    ) -> DataStoreResult<ChatMessage>;

    // =========================================================================
    // Memory operations
    // =========================================================================

    /// Creates a new memory.
    async fn create_memory(&self, memory: Memory) -> DataStoreResult<Memory>;

    /// Lists the owner's memories, newest first.
    async fn list_memories(&self, owner: Uuid) -> DataStoreResult<Vec<Memory>>;

    /// Deletes a memory.
    async fn delete_memory(&self, owner: Uuid, id: Uuid) -> DataStoreResult<()>;

    // =========================================================================
    // Reminder operations
    // =========================================================================

    /// Creates a new reminder.
    async fn create_reminder(&self, reminder: Reminder) -> DataStoreResult<Reminder>;

    /// Gets a reminder by ID, scoped to its owner.
    async fn get_reminder(&self, owner: Uuid, id: Uuid) -> DataStoreResult<Option<Reminder>>;

    /// Lists the owner's reminders, newest first.
    async fn list_reminders(&self, owner: Uuid) -> DataStoreResult<Vec<Reminder>>;

    /// Updates a reminder.
    async fn update_reminder(&self, owner: Uuid, reminder: Reminder) -> DataStoreResult<Reminder>;

    /// Deletes a reminder.
    async fn delete_reminder(&self, owner: Uuid, id: Uuid) -> DataStoreResult<()>;
}
