//! Session store - maps session ids to conversation state
//!
//! Sessions are created lazily on first reference. Each session owns a
//! `Mutex<ConversationState>` held for the duration of a turn, so
//! concurrent requests for the same session are serialized while requests
//! for different sessions proceed in parallel. The store is bounded: when
//! the capacity is reached, the least-recently-used session is evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};

use crate::agent::state::ConversationState;

struct SessionEntry {
    state: Arc<Mutex<ConversationState>>,
    last_used: Instant,
}

/// Concurrency-safe store of per-session conversation state
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    capacity: usize,
}

impl SessionStore {
    /// Create a store bounded to `capacity` live sessions (0 = unbounded)
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Get the state for a session, creating it on first reference
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<ConversationState>> {
        let mut sessions = self.sessions.write().await;

        if let Some(entry) = sessions.get_mut(session_id) {
            entry.last_used = Instant::now();
            return entry.state.clone();
        }

        if self.capacity > 0 && sessions.len() >= self.capacity {
            // An in-flight turn on an evicted session keeps its own Arc;
            // only the mapping is dropped.
            if let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| id.clone())
            {
                tracing::info!(session_id = %oldest, "evicting least-recently-used session");
                sessions.remove(&oldest);
            }
        }

        let state = Arc::new(Mutex::new(ConversationState::new()));
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                state: state.clone(),
                last_used: Instant::now(),
            },
        );
        state
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Whether a session exists without creating it
    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lazy_creation_and_reuse() {
        let store = SessionStore::new(16);
        assert!(store.is_empty().await);

        let first = store.get_or_create("alpha").await;
        first.lock().await.push_user("hello");

        let again = store.get_or_create("alpha").await;
        assert_eq!(again.lock().await.messages.len(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_sessions_are_isolated() {
        let store = SessionStore::new(16);
        store.get_or_create("a").await.lock().await.push_user("to a");
        let b = store.get_or_create("b").await;
        assert!(b.lock().await.messages.is_empty());
    }

    #[tokio::test]
    async fn test_lru_eviction_at_capacity() {
        let store = SessionStore::new(2);
        store.get_or_create("a").await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store.get_or_create("b").await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        // Touch "a" so "b" becomes the eviction candidate.
        store.get_or_create("a").await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        store.get_or_create("c").await;
        assert_eq!(store.len().await, 2);
        assert!(store.contains("a").await);
        assert!(!store.contains("b").await);
        assert!(store.contains("c").await);
    }
}
