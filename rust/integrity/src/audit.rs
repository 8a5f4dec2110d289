use ante_engine::logger::fingerprint;
use ante_engine::player::PlayerAction;
use serde::{Deserialize, Serialize};

/// An action as submitted by a client, with its network origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameAction {
    pub actor_id: String,
    pub action: PlayerAction,
    pub timestamp_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl GameAction {
    pub fn new(actor_id: impl Into<String>, action: PlayerAction, timestamp_ms: i64) -> Self {
        Self {
            actor_id: actor_id.into(),
            action,
            timestamp_ms,
            ip: None,
            device_id: None,
        }
    }

    pub fn with_origin(mut self, ip: impl Into<String>, device_id: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self.device_id = Some(device_id.into());
        self
    }
}

/// Audit form of a [`GameAction`]: origin replaced by fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub actor_id: String,
    #[serde(flatten)]
    pub action: PlayerAction,
    pub timestamp_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_fingerprint: Option<String>,
}

impl From<&GameAction> for AuditEntry {
    fn from(a: &GameAction) -> Self {
        Self {
            actor_id: a.actor_id.clone(),
            action: a.action,
            timestamp_ms: a.timestamp_ms,
            ip_fingerprint: a.ip.as_deref().map(fingerprint),
            device_fingerprint: a.device_id.as_deref().map(fingerprint),
        }
    }
}

/// Append-only record of one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAudit {
    pub game_id: String,
    pub created_at_ms: i64,
    /// Actors in order of first action
    pub players: Vec<String>,
    pub actions: Vec<AuditEntry>,
    /// SHA-256 commitment of the shuffle seed; the seed itself is never stored here
    pub seed_commitment: Option<String>,
    pub verified: bool,
}

impl GameAudit {
    pub fn new(game_id: impl Into<String>, created_at_ms: i64) -> Self {
        Self {
            game_id: game_id.into(),
            created_at_ms,
            players: Vec::new(),
            actions: Vec::new(),
            seed_commitment: None,
            verified: false,
        }
    }

    pub(crate) fn append(&mut self, action: &GameAction) {
        if !self.players.iter().any(|p| p == &action.actor_id) {
            self.players.push(action.actor_id.clone());
        }
        self.actions.push(AuditEntry::from(action));
    }
}
