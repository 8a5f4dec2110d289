use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// Loss tracking for one session. `terminated` is one-way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub loss: u64,
    pub terminated: bool,
}

/// Session loss caps for automated actors.
#[derive(Debug, Default)]
pub struct RiskManager {
    sessions: Mutex<HashMap<String, SessionStats>>,
}

impl RiskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session; an existing one is left as is.
    pub fn start_session(&self, id: &str) {
        self.lock().entry(id.to_string()).or_default();
    }

    /// Add a loss. Negative deltas (winnings) are ignored, so the total never shrinks.
    /// Reaching `max_loss` terminates the session for good.
    pub fn record_loss(&self, id: &str, amount: i64, max_loss: u64) -> SessionStats {
        let mut sessions = self.lock();
        let s = sessions.entry(id.to_string()).or_default();
        s.loss = s.loss.saturating_add(amount.max(0) as u64);
        if !s.terminated && s.loss >= max_loss {
            s.terminated = true;
            tracing::warn!(loss = s.loss, max_loss, "risk_session_terminated");
        }
        *s
    }

    pub fn get_stats(&self, id: &str) -> SessionStats {
        self.lock().get(id).copied().unwrap_or_default()
    }

    pub fn is_terminated(&self, id: &str) -> bool {
        self.get_stats(id).terminated
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionStats>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
