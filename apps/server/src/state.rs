//! Application state.

use std::collections::HashMap;
use std::sync::Arc;

use auth::{JwtManager, Session};
use data_store::DataStore;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;

/// Server-side session cache (in-memory storage), keyed by opaque token.
///
/// Sessions live only as long as the process; restarting the server logs
/// every cookie-based client out, which is acceptable for this design.
#[derive(Debug, Default)]
pub struct SessionCache {
    sessions: HashMap<String, Session>,
}

impl SessionCache {
    /// Creates a new session cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a session.
    pub fn store(&mut self, session: Session) {
        self.sessions.insert(session.token.clone(), session);
    }

    /// Resolves a token to the user it authenticates.
    pub fn resolve(&self, token: &str) -> Option<Uuid> {
        self.sessions.get(token).map(|s| s.user_id)
    }

    /// Removes a session, returning true if it existed.
    pub fn remove(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }
}

/// Shared application state.
pub struct AppState<S: DataStore> {
    /// Server configuration.
    pub config: Config,
    /// Resource store.
    pub store: S,
    /// JWT manager.
    pub jwt: JwtManager,
    /// Session cache for cookie-based credentials.
    pub sessions: RwLock<SessionCache>,
}

impl<S: DataStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S, jwt: JwtManager) -> Self {
        Self {
            config,
            store,
            jwt,
            sessions: RwLock::new(SessionCache::new()),
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config, store, and JWT manager.
pub fn create_shared_state<S: DataStore>(
    config: Config,
    store: S,
    jwt: JwtManager,
) -> SharedState<S> {
    Arc::new(AppState::new(config, store, jwt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cache_round_trip() {
        let mut cache = SessionCache::new();
        let user_id = Uuid::new_v4();
        let session = Session::new(user_id);
        let token = session.token.clone();

        cache.store(session);
        assert_eq!(cache.resolve(&token), Some(user_id));

        assert!(cache.remove(&token));
        assert_eq!(cache.resolve(&token), None);
        assert!(!cache.remove(&token));
    }
}
