use ante_engine::errors::{ErrorCode, GameError};
use serde::Serialize;

/// Verdict for one submitted action. Rejections carry a user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
            code: None,
        }
    }

    pub fn reject(code: ErrorCode, reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
            code: Some(code),
        }
    }

    /// The rejection as a recoverable [`GameError`], for callers that propagate with `?`.
    pub fn into_result(self) -> Result<(), GameError> {
        match (self.valid, self.code) {
            (true, _) => Ok(()),
            (false, code) => Err(GameError::new(
                code.unwrap_or(ErrorCode::InvalidAction),
                self.reason.unwrap_or_else(|| "Invalid action".to_string()),
            )),
        }
    }
}
