//! Registry of live sessions

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::state::Session;

/// Handle to one session; holding the lock serialises that session's requests
pub type SessionHandle = Arc<Mutex<Session>>;

/// Concurrent map of sessions keyed by id
pub struct SessionManager {
    sessions: DashMap<Uuid, SessionHandle>,
    window_turns: usize,
}

impl SessionManager {
    pub fn new(window_turns: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            window_turns,
        }
    }

    pub fn create(&self) -> (Uuid, SessionHandle) {
        let session = Session::new(self.window_turns);
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&handle));
        tracing::info!("Session {} created", id);
        (id, handle)
    }

    pub fn get(&self, id: Uuid) -> Result<SessionHandle> {
        self.sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(Error::SessionNotFound(id))
    }

    pub fn remove(&self, id: Uuid) -> Result<SessionHandle> {
        self.sessions
            .remove(&id)
            .map(|(_, handle)| handle)
            .ok_or(Error::SessionNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
