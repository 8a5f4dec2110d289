use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ante_engine::player::ActionKind;
use serde::{Deserialize, Serialize};

/// Assumed aggression for an actor with no history.
pub const AGGRESSION_PRIOR: f64 = 0.2;
/// Assumed check-raise frequency for an actor with no history.
pub const CHECK_RAISE_PRIOR: f64 = 0.05;

/// The action an actor was responding to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevAction {
    pub actor_id: String,
    pub kind: ActionKind,
}

impl PrevAction {
    pub fn new(actor_id: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            actor_id: actor_id.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionStats {
    pub actions: u64,
    pub aggressive: u64,
    pub check_raises: u64,
}

/// Per-actor tendencies observed across hands.
#[derive(Debug, Default)]
pub struct OpponentModel {
    stats: Mutex<HashMap<String, ActionStats>>,
}

impl OpponentModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one action. A raise that answers another actor's bet or raise also counts
    /// as a check-raise.
    pub fn record_action(&self, actor_id: &str, kind: ActionKind, prev: Option<&PrevAction>) {
        let mut stats = self.lock();
        let s = stats.entry(actor_id.to_string()).or_default();
        s.actions += 1;
        if kind.is_aggressive() {
            s.aggressive += 1;
        }
        let answers_aggression =
            prev.is_some_and(|p| p.actor_id != actor_id && p.kind.is_aggressive());
        if answers_aggression && kind == ActionKind::Raise {
            s.check_raises += 1;
        }
    }

    /// Share of aggressive actions, rounded to two decimals.
    pub fn get_aggression(&self, actor_id: &str) -> f64 {
        match self.stats(actor_id) {
            Some(s) if s.actions > 0 => round2(s.aggressive as f64 / s.actions as f64),
            _ => AGGRESSION_PRIOR,
        }
    }

    pub fn get_check_raise_freq(&self, actor_id: &str) -> f64 {
        match self.stats(actor_id) {
            Some(s) if s.actions > 0 => round2(s.check_raises as f64 / s.actions as f64),
            _ => CHECK_RAISE_PRIOR,
        }
    }

    pub fn stats(&self, actor_id: &str) -> Option<ActionStats> {
        self.lock().get(actor_id).copied()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ActionStats>> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
