//! In-memory session registry.
//!
//! Each session sits behind its own mutex so actions on different games never
//! contend. The map itself is a `DashMap`; its shard locks are only held long
//! enough to clone the `Arc` out, never across a session mutation.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::domain::{GameSession, SessionId};
use crate::errors::domain::DomainError;

pub type SharedSession = Arc<Mutex<GameSession>>;

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, SharedSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Registers a new session. An existing session with the same id is
    /// replaced.
    pub fn insert(&self, session: GameSession) -> SharedSession {
        let id = session.id.clone();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, shared.clone());
        shared
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Runs `f` with exclusive access to the session.
    ///
    /// The whole read-check-mutate sequence of an action goes through here.
    pub fn with_session_mut<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let shared = self.get(id).ok_or(DomainError::SessionNotFound)?;
        let mut guard = shared.lock();
        f(&mut guard)
    }

    /// Consistent copy of the session, taken under its lock.
    pub fn snapshot(&self, id: &str) -> Option<GameSession> {
        self.get(id).map(|shared| shared.lock().clone())
    }

    pub fn remove(&self, id: &str) -> Option<SharedSession> {
        self.sessions.remove(id).map(|(_, shared)| shared)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Removes every session idle for longer than `idle` and returns their
    /// final state.
    pub fn reap_idle(&self, now: OffsetDateTime, idle: Duration) -> Vec<GameSession> {
        let cutoff = now - idle;
        let stale: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().lock().last_activity < cutoff)
            .map(|entry| entry.key().clone())
            .collect();

        stale
            .iter()
            .filter_map(|id| {
                // Re-check under the lock: an action may have landed meanwhile.
                let (_, shared) = self
                    .sessions
                    .remove_if(id, |_, shared| shared.lock().last_activity < cutoff)?;
                debug!(game = %id, "Idle session removed");
                let session = shared.lock().clone();
                Some(session)
            })
            .collect()
    }
}
