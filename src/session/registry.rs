//! Outer registry mapping session ids to live sessions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::{IdGenerator, ReasoningSession, UuidIdGenerator};
use crate::config::SessionConfig;

/// Registry of live sessions, keyed by session id.
///
/// Guards concurrent creation and eviction of entries; each session isolates
/// its own state, so no cross-session locking happens beyond the map itself.
/// Sessions evicted by their own inactivity watcher stay in the map as dead
/// entries until [`prune_inactive`](Self::prune_inactive) sweeps them.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, ReasoningSession>>,
    config: SessionConfig,
    ids: Arc<dyn IdGenerator>,
}

impl SessionRegistry {
    /// Create a registry whose sessions share the given defaults.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_id_generator(config, Arc::new(UuidIdGenerator))
    }

    /// Create a registry with an injected id generator shared by every
    /// session it creates.
    pub fn with_id_generator(config: SessionConfig, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
            ids,
        }
    }

    /// Fetch the session for an id, creating it if absent.
    ///
    /// A terminated session still registered under the id is replaced with a
    /// fresh one; terminal sessions cannot be reused.
    pub async fn get_or_create(&self, session_id: &str) -> ReasoningSession {
        if let Some(session) = self.get(session_id).await {
            if session.is_active().await {
                return session;
            }
        }

        let mut sessions = self.sessions.write().await;
        // Double check: another caller may have created it while we waited
        // for the write lock.
        if let Some(session) = sessions.get(session_id) {
            if session.is_active().await {
                return session.clone();
            }
        }

        debug!(session_id, "creating session");
        let session = ReasoningSession::with_id_generator(
            session_id,
            self.config.clone(),
            Arc::clone(&self.ids),
        );
        sessions.insert(session_id.to_string(), session.clone());
        session
    }

    /// Fetch a session without creating it.
    pub async fn get(&self, session_id: &str) -> Option<ReasoningSession> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Clean up and drop a session. Returns whether an entry existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id);
        match removed {
            Some(session) => {
                session.cleanup().await;
                true
            }
            None => false,
        }
    }

    /// Drop every entry whose session has already been evicted or cleaned.
    /// Returns the number of entries swept.
    pub async fn prune_inactive(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let mut dead = Vec::new();
        for (id, session) in sessions.iter() {
            if !session.is_active().await {
                dead.push(id.clone());
            }
        }
        for id in &dead {
            sessions.remove(id);
        }
        if !dead.is_empty() {
            debug!(count = dead.len(), "pruned inactive sessions");
        }
        dead.len()
    }

    /// Number of registered sessions, active or not.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the registry holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
