use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as SessionLock;

use crate::models::user_session::UserSession;

/// Registry of per-user sessions. The outer map is guarded by a plain
/// mutex (held only for lookup/insert, never across awaits); each session
/// carries its own async lock so one user's turn never blocks another's.
#[derive(Clone, Default)]
pub struct GlobalSessionManager {
    sessions: Arc<Mutex<HashMap<i64, Arc<SessionLock<UserSession>>>>>,
}

impl GlobalSessionManager {
    pub fn new() -> Self {
        GlobalSessionManager {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the session for `user_id`, creating it on first contact.
    /// Concurrent first contact from the same user resolves to the same
    /// session.
    pub fn get_or_create(&self, user_id: i64) -> Arc<SessionLock<UserSession>> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.entry(user_id).or_default().clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}
