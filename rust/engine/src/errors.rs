use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logger::redact_metadata;

/// Stable, machine-readable error codes shared by every crate in the workspace.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // game state
    #[serde(rename = "ERR_DECK_EXHAUSTED")]
    DeckExhausted,
    #[serde(rename = "ERR_INVALID_GAME_STATE")]
    InvalidGameState,
    #[serde(rename = "ERR_INVALID_STAGE")]
    InvalidStage,
    #[serde(rename = "ERR_DUPLICATE_CARDS")]
    DuplicateCards,
    #[serde(rename = "ERR_INVALID_HAND_SIZE")]
    InvalidHandSize,
    // validation
    #[serde(rename = "ERR_INVALID_TURN")]
    InvalidTurn,
    #[serde(rename = "ERR_BET_TOO_SMALL")]
    BetTooSmall,
    #[serde(rename = "ERR_BET_TOO_LARGE")]
    BetTooLarge,
    #[serde(rename = "ERR_INSUFFICIENT_CHIPS")]
    InsufficientChips,
    #[serde(rename = "ERR_ACTION_TOO_FAST")]
    ActionTooFast,
    #[serde(rename = "ERR_INVALID_ACTION")]
    InvalidAction,
    #[serde(rename = "ERR_INVALID_BET_AMOUNT")]
    InvalidBetAmount,
    // security
    #[serde(rename = "ERR_BOT_DETECTED")]
    BotDetected,
    #[serde(rename = "ERR_COLLUSION_DETECTED")]
    CollusionDetected,
    #[serde(rename = "ERR_MULTI_ACCOUNT")]
    MultiAccount,
    #[serde(rename = "ERR_SUSPICIOUS_BETTING")]
    SuspiciousBetting,
    // server / infra
    #[serde(rename = "ERR_ENTROPY_UNAVAILABLE")]
    EntropyUnavailable,
    #[serde(rename = "ERR_SERVER_ERROR")]
    ServerError,
}

/// Broad family an [`ErrorCode`] belongs to. Drives the default recoverability.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    GameState,
    Validation,
    Security,
    Server,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DeckExhausted => "ERR_DECK_EXHAUSTED",
            ErrorCode::InvalidGameState => "ERR_INVALID_GAME_STATE",
            ErrorCode::InvalidStage => "ERR_INVALID_STAGE",
            ErrorCode::DuplicateCards => "ERR_DUPLICATE_CARDS",
            ErrorCode::InvalidHandSize => "ERR_INVALID_HAND_SIZE",
            ErrorCode::InvalidTurn => "ERR_INVALID_TURN",
            ErrorCode::BetTooSmall => "ERR_BET_TOO_SMALL",
            ErrorCode::BetTooLarge => "ERR_BET_TOO_LARGE",
            ErrorCode::InsufficientChips => "ERR_INSUFFICIENT_CHIPS",
            ErrorCode::ActionTooFast => "ERR_ACTION_TOO_FAST",
            ErrorCode::InvalidAction => "ERR_INVALID_ACTION",
            ErrorCode::InvalidBetAmount => "ERR_INVALID_BET_AMOUNT",
            ErrorCode::BotDetected => "ERR_BOT_DETECTED",
            ErrorCode::CollusionDetected => "ERR_COLLUSION_DETECTED",
            ErrorCode::MultiAccount => "ERR_MULTI_ACCOUNT",
            ErrorCode::SuspiciousBetting => "ERR_SUSPICIOUS_BETTING",
            ErrorCode::EntropyUnavailable => "ERR_ENTROPY_UNAVAILABLE",
            ErrorCode::ServerError => "ERR_SERVER_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        use ErrorCode::*;
        match self {
            DeckExhausted | InvalidGameState | InvalidStage | DuplicateCards | InvalidHandSize => {
                ErrorCategory::GameState
            }
            InvalidTurn | BetTooSmall | BetTooLarge | InsufficientChips | ActionTooFast
            | InvalidAction | InvalidBetAmount => ErrorCategory::Validation,
            BotDetected | CollusionDetected | MultiAccount | SuspiciousBetting => {
                ErrorCategory::Security
            }
            EntropyUnavailable | ServerError => ErrorCategory::Server,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCategory {
    /// Game-state and infra failures abort the triggering operation; validation and
    /// security verdicts leave the decision to the caller.
    pub fn default_recoverable(&self) -> bool {
        matches!(self, ErrorCategory::Validation | ErrorCategory::Security)
    }
}

/// The single domain error of the core.
///
/// Every instance carries a stable [`ErrorCode`], a correlation id for tracing one
/// failure across logs, a recoverability flag and sanitized metadata. Seeds, secrets
/// and actor identifiers never survive into `metadata` in cleartext.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{code}: {message}")]
pub struct GameError {
    pub code: ErrorCode,
    pub message: String,
    pub correlation_id: String,
    pub recoverable: bool,
    pub timestamp_ms: i64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl GameError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            correlation_id: uuid::Uuid::new_v4().to_string(),
            recoverable: code.category().default_recoverable(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach one metadata entry. Secrets and identities under the key are redacted
    /// before it is stored, since the serialized error may reach a client.
    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        let mut entry = serde_json::Map::new();
        entry.insert(key.to_string(), value.into());
        if let serde_json::Value::Object(clean) = redact_metadata(serde_json::Value::Object(entry))
        {
            for (k, v) in clean {
                self.metadata.insert(k, v);
            }
        }
        self
    }

    pub fn recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    pub fn deck_exhausted(needed: usize, available: usize) -> Self {
        GameError::new(ErrorCode::DeckExhausted, "Insufficient cards in deck")
            .with_meta("cards_needed", needed)
            .with_meta("deck_size", available)
    }

    pub fn invalid_hand_size(count: usize) -> Self {
        GameError::new(
            ErrorCode::InvalidHandSize,
            format!("Hand must have between 5 and 7 cards, got {}", count),
        )
        .with_meta("card_count", count)
    }

    pub fn invalid_stage(stage: &str) -> Self {
        GameError::new(ErrorCode::InvalidStage, "Invalid game stage").with_meta("stage", stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_drive_recoverability() {
        assert!(!GameError::new(ErrorCode::DeckExhausted, "x").recoverable);
        assert!(GameError::new(ErrorCode::BetTooSmall, "x").recoverable);
        assert!(GameError::new(ErrorCode::BotDetected, "x").recoverable);
        assert!(!GameError::new(ErrorCode::EntropyUnavailable, "x").recoverable);
    }

    #[test]
    fn display_includes_stable_code() {
        let e = GameError::invalid_stage("bogus");
        assert_eq!(e.to_string(), "ERR_INVALID_STAGE: Invalid game stage");
    }

    #[test]
    fn correlation_ids_are_unique() {
        let a = GameError::new(ErrorCode::ServerError, "a");
        let b = GameError::new(ErrorCode::ServerError, "b");
        assert_ne!(a.correlation_id, b.correlation_id);
    }

    #[test]
    fn seed_metadata_is_redacted() {
        let e = GameError::new(ErrorCode::ServerError, "x").with_meta("shuffle_seed", "deadbeef");
        assert_eq!(e.metadata["shuffle_seed"], "[REDACTED]");
    }

    #[test]
    fn serializes_code_as_stable_string() {
        let e = GameError::deck_exhausted(4, 3);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["code"], "ERR_DECK_EXHAUSTED");
        assert_eq!(json["metadata"]["cards_needed"], 4);
        assert_eq!(json["recoverable"], false);
    }
}
