//! In-memory per-session history.
//!
//! Each session id maps to a bounded, insertion-ordered deque of
//! [`Exchange`]s. Histories are created lazily on first append and live until
//! [`SessionStore::clear`] or process exit.
//!
//! # Concurrency
//!
//! The map is a sharded [`DashMap`]. Every operation holds the lock of one
//! entry only for its own duration, so append-with-trim on a session is
//! atomic with respect to other operations on that session, and requests
//! for different sessions do not serialize behind a global lock. No lock is
//! ever held across an `.await`.

use std::collections::VecDeque;

use aurora_core::exchange::Exchange;
use dashmap::DashMap;
use tracing::debug;

/// Maximum exchanges retained per session; the oldest are dropped first.
pub const MAX_EXCHANGES: usize = 20;

/// Process-wide owner of every session's history.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, VecDeque<Exchange>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an exchange, then trim from the front down to [`MAX_EXCHANGES`].
    pub fn append(&self, session_id: &str, exchange: Exchange) {
        let mut history = self.sessions.entry(session_id.to_string()).or_default();
        history.push_back(exchange);

        while history.len() > MAX_EXCHANGES {
            history.pop_front();
        }

        debug_assert!(history.len() <= MAX_EXCHANGES);
        debug!(session_id, len = history.len(), "Appended exchange");
    }

    /// A snapshot of the session's history, oldest first.
    ///
    /// Unknown sessions read as empty.
    pub fn read(&self, session_id: &str) -> Vec<Exchange> {
        self.sessions
            .get(session_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove the session entirely. Clearing an unknown id is a no-op.
    ///
    /// Returns whether a history existed.
    pub fn clear(&self, session_id: &str) -> bool {
        let existed = self.sessions.remove(session_id).is_some();
        if existed {
            debug!(session_id, "Cleared session history");
        }
        existed
    }

    /// Number of exchanges currently held for a session.
    pub fn len(&self, session_id: &str) -> usize {
        self.sessions
            .get(session_id)
            .map(|history| history.len())
            .unwrap_or(0)
    }

    /// Number of sessions with in-memory history.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
