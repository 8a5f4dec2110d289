use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::behavior::FlagKind;

/// Suspicion points added per flag kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagPoints {
    pub bot_timing: u32,
    pub exact_timing: u32,
    pub instant_action: u32,
    pub collusion: u32,
    pub multi_account: u32,
    pub optimal_betting: u32,
}

impl Default for FlagPoints {
    fn default() -> Self {
        Self {
            bot_timing: 15,
            exact_timing: 20,
            instant_action: 20,
            collusion: 25,
            multi_account: 20,
            optimal_betting: 10,
        }
    }
}

impl FlagPoints {
    pub fn for_kind(&self, kind: FlagKind) -> u32 {
        match kind {
            FlagKind::BotTiming => self.bot_timing,
            FlagKind::ExactTiming => self.exact_timing,
            FlagKind::InstantAction => self.instant_action,
            FlagKind::Collusion => self.collusion,
            FlagKind::MultiAccount => self.multi_account,
            FlagKind::OptimalBetting => self.optimal_betting,
        }
    }
}

/// Detector thresholds. Heuristic by nature; tune them, do not trust them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Pair score strictly above this flags both actors
    pub collusion_threshold: f64,
    /// Max VPIP and PFR difference for two actors to count as alike
    pub collusion_similarity: f64,
    /// Hands each actor must have recorded before a pair is scored. 0 scores every pair
    pub collusion_min_hands: u64,
    pub collusion_match_score: f64,
    pub collusion_base_score: f64,

    pub timing_window: usize,
    pub timing_min_samples: usize,
    /// Variance of action deltas (ms^2) below which timing is bot-like
    pub timing_variance_ms: f64,
    pub exact_interval_bucket_ms: i64,
    pub min_human_reaction_ms: i64,
    pub reject_instant_actions: bool,
    /// Minimum gap since the table's previous action for an action to be accepted
    pub min_action_interval_ms: i64,

    pub bet_window: usize,
    pub bet_min_samples: usize,
    pub optimal_ratio_low: f64,
    pub optimal_ratio_high: f64,
    /// Share of optimal bets above which betting is flagged
    pub optimal_fraction: f64,

    pub suspicion_limit: u32,
    /// Most recent flags kept per actor; suspicion counts every flag
    pub flag_history: usize,
    pub points: FlagPoints,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            collusion_threshold: 0.85,
            collusion_similarity: 0.05,
            collusion_min_hands: 0,
            collusion_match_score: 0.9,
            collusion_base_score: 0.5,
            timing_window: 50,
            timing_min_samples: 10,
            timing_variance_ms: 50.0,
            exact_interval_bucket_ms: 100,
            min_human_reaction_ms: 200,
            reject_instant_actions: true,
            min_action_interval_ms: 500,
            bet_window: 100,
            bet_min_samples: 20,
            optimal_ratio_low: 0.32,
            optimal_ratio_high: 0.35,
            optimal_fraction: 0.8,
            suspicion_limit: 75,
            flag_history: 50,
            points: FlagPoints::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid integrity setting: {0}")]
    InvalidValue(String),
}

impl IntegrityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue(format!(
                    "{} must be within [0, 1]",
                    name
                )))
            }
        };
        unit("collusion_threshold", self.collusion_threshold)?;
        unit("collusion_similarity", self.collusion_similarity)?;
        unit("collusion_match_score", self.collusion_match_score)?;
        unit("collusion_base_score", self.collusion_base_score)?;
        unit("optimal_fraction", self.optimal_fraction)?;
        if self.optimal_ratio_low > self.optimal_ratio_high {
            return Err(ConfigError::InvalidValue(
                "optimal_ratio_low must not exceed optimal_ratio_high".to_string(),
            ));
        }
        if self.timing_min_samples < 2 || self.timing_window < self.timing_min_samples {
            return Err(ConfigError::InvalidValue(
                "timing_window must hold at least timing_min_samples >= 2".to_string(),
            ));
        }
        if self.bet_min_samples == 0 || self.bet_window < self.bet_min_samples {
            return Err(ConfigError::InvalidValue(
                "bet_window must hold at least bet_min_samples > 0".to_string(),
            ));
        }
        if self.exact_interval_bucket_ms <= 0 {
            return Err(ConfigError::InvalidValue(
                "exact_interval_bucket_ms must be positive".to_string(),
            ));
        }
        if self.suspicion_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "suspicion_limit must be greater than 0".to_string(),
            ));
        }
        if self.flag_history == 0 {
            return Err(ConfigError::InvalidValue(
                "flag_history must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
