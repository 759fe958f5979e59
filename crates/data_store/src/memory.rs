//! In-memory data store implementation for testing.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{Chat, ChatMessage, Memory, MessageRole, Reminder, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{DataStore, DataStoreError, DataStoreResult};

/// In-memory data store for testing purposes.
///
/// Tables requiring joint updates (chats and messages) are always locked
/// in that order.
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    chats: Arc<RwLock<HashMap<Uuid, Chat>>>,
    messages: Arc<RwLock<HashMap<Uuid, ChatMessage>>>,
    memories: Arc<RwLock<HashMap<Uuid, Memory>>>,
    reminders: Arc<RwLock<HashMap<Uuid, Reminder>>>,
}

impl MemoryDataStore {
    /// Creates a new in-memory data store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> DataStoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DataStoreError::already_exists("User", user.email.clone()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> DataStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> DataStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, user: User) -> DataStoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(DataStoreError::not_found("User", user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    // =========================================================================
    // Chat operations
    // =========================================================================

    async fn create_chat(&self, chat: Chat) -> DataStoreResult<Chat> {
        let mut chats = self.chats.write().await;
        chats.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, owner: Uuid, id: Uuid) -> DataStoreResult<Option<Chat>> {
        let chats = self.chats.read().await;
        Ok(chats.get(&id).filter(|c| c.user_id == owner).cloned())
    }

    async fn list_chats(&self, owner: Uuid) -> DataStoreResult<Vec<Chat>> {
        let chats = self.chats.read().await;
        let mut result: Vec<Chat> = chats
            .values()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }

    async fn delete_chat(&self, owner: Uuid, id: Uuid) -> DataStoreResult<()> {
        let mut chats = self.chats.write().await;
        let mut messages = self.messages.write().await;

        match chats.get(&id) {
            Some(chat) if chat.user_id == owner => {
                chats.remove(&id);
                messages.retain(|_, m| m.chat_id != id);
                Ok(())
            }
            _ => Err(DataStoreError::not_found("Chat", id.to_string())),
        }
    }

    // =========================================================================
    // Chat message operations
    // =========================================================================

    async fn list_messages(
        &self,
        owner: Uuid,
        chat_id: Uuid,
    ) -> DataStoreResult<Vec<ChatMessage>> {
        let chats = self.chats.read().await;
        if !chats.get(&chat_id).is_some_and(|c| c.user_id == owner) {
            return Err(DataStoreError::not_found("Chat", chat_id.to_string()));
        }

        let messages = self.messages.read().await;
        let mut result: Vec<ChatMessage> = messages
            .values()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    async fn append_message(
        &self,
        owner: Uuid,
        chat_id: Uuid,
        role: MessageRole,
        content: String,
    ) -> DataStoreResult<ChatMessage> {
        // Both write locks are held for the whole unit, so readers never
        // observe the message without the chat metadata or vice versa.
        let mut chats = self.chats.write().await;
        let mut messages = self.messages.write().await;

        let chat = chats
            .get_mut(&chat_id)
            .filter(|c| c.user_id == owner)
            .ok_or_else(|| DataStoreError::not_found("Chat", chat_id.to_string()))?;

        let message = ChatMessage::new(chat_id, role, content);
        chat.record_message(&message.content);
        messages.insert(message.id, message.clone());

        Ok(message)
    }

    // =========================================================================
    // Memory operations
    // =========================================================================

    async fn create_memory(&self, memory: Memory) -> DataStoreResult<Memory> {
        let mut memories = self.memories.write().await;
        memories.insert(memory.id, memory.clone());
        Ok(memory)
    }

    async fn list_memories(&self, owner: Uuid) -> DataStoreResult<Vec<Memory>> {
        let memories = self.memories.read().await;
        let mut result: Vec<Memory> = memories
            .values()
            .filter(|m| m.user_id == owner)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn delete_memory(&self, owner: Uuid, id: Uuid) -> DataStoreResult<()> {
        let mut memories = self.memories.write().await;
        match memories.get(&id) {
            Some(memory) if memory.user_id == owner => {
                memories.remove(&id);
                Ok(())
            }
            _ => Err(DataStoreError::not_found("Memory", id.to_string())),
        }
    }

    // =========================================================================
    // Reminder operations
    // =========================================================================

    async fn create_reminder(&self, reminder: Reminder) -> DataStoreResult<Reminder> {
        let mut reminders = self.reminders.write().await;
        reminders.insert(reminder.id, reminder.clone());
        Ok(reminder)
    }

    async fn get_reminder(&self, owner: Uuid, id: Uuid) -> DataStoreResult<Option<Reminder>> {
        let reminders = self.reminders.read().await;
        Ok(reminders.get(&id).filter(|r| r.user_id == owner).cloned())
    }

    async fn list_reminders(&self, owner: Uuid) -> DataStoreResult<Vec<Reminder>> {
        let reminders = self.reminders.read().await;
        let mut result: Vec<Reminder> = reminders
            .values()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update_reminder(&self, owner: Uuid, reminder: Reminder) -> DataStoreResult<Reminder> {
        let mut reminders = self.reminders.write().await;
        match reminders.get(&reminder.id) {
            Some(existing) if existing.user_id == owner && reminder.user_id == owner => {
                reminders.insert(reminder.id, reminder.clone());
                Ok(reminder)
            }
            _ => Err(DataStoreError::not_found("Reminder", reminder.id.to_string())),
        }
    }

    async fn delete_reminder(&self, owner: Uuid, id: Uuid) -> DataStoreResult<()> {
        let mut reminders = self.reminders.write().await;
        match reminders.get(&id) {
            Some(reminder) if reminder.user_id == owner => {
                reminders.remove(&id);
                Ok(())
            }
            _ => Err(DataStoreError::not_found("Reminder", id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new(email, "Test User", "hash")
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryDataStore::new();
        store.create_user(user("a@example.com")).await.unwrap();

        let result = store.create_user(user("a@example.com")).await;
        assert!(matches!(
            result,
            Err(DataStoreError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_foreign_chat_is_absent() {
        let store = MemoryDataStore::new();
        let alice = store.create_user(user("alice@example.com")).await.unwrap();
        let bob = store.create_user(user("bob@example.com")).await.unwrap();

        let chat = store.create_chat(Chat::new(alice.id, None)).await.unwrap();

        assert!(store.get_chat(bob.id, chat.id).await.unwrap().is_none());
        assert!(store.get_chat(alice.id, chat.id).await.unwrap().is_some());
        assert!(matches!(
            store.delete_chat(bob.id, chat.id).await,
            Err(DataStoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_append_message_updates_chat_metadata() {
        let store = MemoryDataStore::new();
        let owner = store.create_user(user("a@example.com")).await.unwrap();
        let chat = store.create_chat(Chat::new(owner.id, None)).await.unwrap();
        let before = chat.updated_at;

        let message = store
            .append_message(owner.id, chat.id, MessageRole::User, "hello".to_string())
            .await
            .unwrap();

        let chat = store.get_chat(owner.id, chat.id).await.unwrap().unwrap();
        assert_eq!(chat.last_message, message.content);
        assert!(chat.updated_at > before);
    }

    #[tokio::test]
    async fn test_append_to_foreign_chat_fails() {
        let store = MemoryDataStore::new();
        let alice = store.create_user(user("alice@example.com")).await.unwrap();
        let bob = store.create_user(user("bob@example.com")).await.unwrap();
        let chat = store.create_chat(Chat::new(alice.id, None)).await.unwrap();

        let result = store
            .append_message(bob.id, chat.id, MessageRole::User, "hi".to_string())
            .await;
        assert!(matches!(result, Err(DataStoreError::NotFound { .. })));

        // Nothing was persisted for the owner either.
        assert!(store.list_messages(alice.id, chat.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_messages_listed_in_creation_order() {
        let store = MemoryDataStore::new();
        let owner = store.create_user(user("a@example.com")).await.unwrap();
        let chat = store.create_chat(Chat::new(owner.id, None)).await.unwrap();

        for content in ["first", "second", "third"] {
            store
                .append_message(owner.id, chat.id, MessageRole::User, content.to_string())
                .await
                .unwrap();
        }

        let messages = store.list_messages(owner.id, chat.id).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_chats_listed_most_recently_updated_first() {
        let store = MemoryDataStore::new();
        let owner = store.create_user(user("a@example.com")).await.unwrap();
        let older = store.create_chat(Chat::new(owner.id, None)).await.unwrap();
        let newer = store.create_chat(Chat::new(owner.id, None)).await.unwrap();

        let chats = store.list_chats(owner.id).await.unwrap();
        assert_eq!(chats[0].id, newer.id);

        // Appending to the older chat moves it to the front.
        store
            .append_message(owner.id, older.id, MessageRole::Ai, "pong".to_string())
            .await
            .unwrap();
        let chats = store.list_chats(owner.id).await.unwrap();
        assert_eq!(chats[0].id, older.id);
    }

    #[tokio::test]
    async fn test_delete_chat_cascades_to_messages() {
        let store = MemoryDataStore::new();
        let owner = store.create_user(user("a@example.com")).await.unwrap();
        let chat = store.create_chat(Chat::new(owner.id, None)).await.unwrap();
        store
            .append_message(owner.id, chat.id, MessageRole::User, "hello".to_string())
            .await
            .unwrap();

        store.delete_chat(owner.id, chat.id).await.unwrap();

        assert!(store.get_chat(owner.id, chat.id).await.unwrap().is_none());
        assert!(matches!(
            store.list_messages(owner.id, chat.id).await,
            Err(DataStoreError::NotFound { .. })
        ));
        assert!(store.messages.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_memories_scoped_and_newest_first() {
        let store = MemoryDataStore::new();
        let alice = store.create_user(user("alice@example.com")).await.unwrap();
        let bob = store.create_user(user("bob@example.com")).await.unwrap();

        let first = store
            .create_memory(Memory::new(alice.id, "first", None, None, None))
            .await
            .unwrap();
        let second = store
            .create_memory(Memory::new(alice.id, "second", None, None, None))
            .await
            .unwrap();

        let memories = store.list_memories(alice.id).await.unwrap();
        assert_eq!(memories[0].id, second.id);
        assert_eq!(memories[1].id, first.id);

        assert!(store.list_memories(bob.id).await.unwrap().is_empty());
        assert!(matches!(
            store.delete_memory(bob.id, first.id).await,
            Err(DataStoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_reminder_update_scoped_to_owner() {
        let store = MemoryDataStore::new();
        let alice = store.create_user(user("alice@example.com")).await.unwrap();
        let bob = store.create_user(user("bob@example.com")).await.unwrap();

        let mut reminder = store
            .create_reminder(Reminder::new(alice.id, "water plants"))
            .await
            .unwrap();
        reminder.completed = true;

        assert!(matches!(
            store.update_reminder(bob.id, reminder.clone()).await,
            Err(DataStoreError::NotFound { .. })
        ));

        let updated = store.update_reminder(alice.id, reminder).await.unwrap();
        assert!(updated.completed);
    }
}
