//! Session Store — pluggable, trait-based home for per-session state.
//!
//! Default: `InMemorySessionStore` (process lifetime, no eviction).
//! The engine holds an `Arc<dyn SessionStore>`, so a networked or persistent store
//! can be swapped in without touching the stage machine.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::interview::session::Session;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, creating a fresh intro session for unknown ids. Never fails.
    async fn get_or_create(&self, session_id: &str) -> Session;

    /// Returns the stored session without creating one.
    async fn get(&self, session_id: &str) -> Option<Session>;

    /// Replaces the stored session if it still exists. Returns `false` when the session was
    /// removed after it was loaded, in which case nothing is written.
    async fn save(&self, session_id: &str, session: Session) -> bool;

    /// Explicit external reset. Returns whether a session existed.
    async fn remove(&self, session_id: &str) -> bool;

    async fn session_count(&self) -> usize;
}

/// Sessions live in a map guarded by a lock that is never held across a model call.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> Session {
        if let Some(session) = self.sessions.read().await.get(session_id) {
            return session.clone();
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id, "Created new interview session");
                Session::default()
            })
            .clone()
    }

    async fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.read().await.get(session_id).cloned()
    }

    async fn save(&self, session_id: &str, session: Session) -> bool {
        match self.sessions.write().await.get_mut(session_id) {
            Some(stored) => {
                *stored = session;
                true
            }
            None => false,
        }
    }

    async fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            info!(session_id, "Interview session reset");
        }
        removed
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::interview::session::Stage;

    #[tokio::test]
    async fn test_get_or_create_starts_at_intro() {
        let store = InMemorySessionStore::new();
        let session = store.get_or_create("abc").await;
        assert_eq!(session.stage, Stage::Intro);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_returns_saved_session() {
        let store = InMemorySessionStore::new();
        let mut session = store.get_or_create("abc").await;
        session.stage = Stage::Warmup { index: 1 };
        assert!(store.save("abc", session).await);

        let again = store.get_or_create("abc").await;
        assert_eq!(again.stage, Stage::Warmup { index: 1 });
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_save_does_not_resurrect_removed_session() {
        let store = InMemorySessionStore::new();
        let mut session = store.get_or_create("abc").await;
        store.remove("abc").await;

        session.stage = Stage::Summary;
        assert!(!store.save("abc", session).await);
        assert!(store.get("abc").await.is_none());
    }

    #[tokio::test]
    async fn test_get_does_not_create() {
        let store = InMemorySessionStore::new();
        assert!(store.get("missing").await.is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_reports_existence() {
        let store = InMemorySessionStore::new();
        store.get_or_create("abc").await;
        assert!(store.remove("abc").await);
        assert!(!store.remove("abc").await);
        assert!(store.get("abc").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creation_of_distinct_keys() {
        let store = Arc::new(InMemorySessionStore::new());
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.get_or_create(&format!("session-{i}")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.session_count().await, 32);
    }
}
