use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pacing profile for automated seats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl BotLevel {
    /// Inclusive think-time bounds in milliseconds.
    pub fn think_time_range(self) -> (u64, u64) {
        match self {
            BotLevel::Easy => (1200, 2400),
            BotLevel::Medium => (800, 1600),
            BotLevel::Hard => (400, 900),
        }
    }

    pub fn think_time_ms<R: Rng + ?Sized>(self, rng: &mut R) -> u64 {
        let (lo, hi) = self.think_time_range();
        rng.random_range(lo..=hi)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BotLevel::Easy => "easy",
            BotLevel::Medium => "medium",
            BotLevel::Hard => "hard",
        }
    }
}

impl fmt::Display for BotLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BotLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(BotLevel::Easy),
            "medium" => Ok(BotLevel::Medium),
            "hard" => Ok(BotLevel::Hard),
            other => Err(format!("unknown bot level: {}", other)),
        }
    }
}
