use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use ante_engine::game::Stage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strength::StrengthTier;

/// Stack-to-pot ratio cut points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprThresholds {
    /// At or below: committed play, size up
    pub low: f64,
    /// At or below: check-raise territory
    pub medium: f64,
    /// At or above: deep, size down
    pub high: f64,
}

impl Default for SprThresholds {
    fn default() -> Self {
        Self {
            low: 3.0,
            medium: 6.0,
            high: 10.0,
        }
    }
}

/// Pot fraction to bet for each strength tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TierSizing {
    pub weak: f64,
    pub moderate: f64,
    pub strong: f64,
}

impl TierSizing {
    const fn new(weak: f64, moderate: f64, strong: f64) -> Self {
        Self {
            weak,
            moderate,
            strong,
        }
    }

    pub fn for_tier(&self, tier: StrengthTier) -> f64 {
        match tier {
            StrengthTier::Weak => self.weak,
            StrengthTier::Moderate => self.moderate,
            StrengthTier::Strong => self.strong,
        }
    }

    fn values(&self) -> [f64; 3] {
        [self.weak, self.moderate, self.strong]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetSizing {
    pub preflop: TierSizing,
    pub flop: TierSizing,
    pub turn: TierSizing,
    pub river: TierSizing,
    pub showdown: TierSizing,
}

impl Default for BetSizing {
    fn default() -> Self {
        Self {
            preflop: TierSizing::new(0.0, 0.33, 0.6),
            flop: TierSizing::new(0.0, 0.5, 0.75),
            turn: TierSizing::new(0.0, 0.6, 0.8),
            river: TierSizing::new(0.0, 0.7, 0.9),
            showdown: TierSizing::new(0.0, 0.0, 0.0),
        }
    }
}

impl BetSizing {
    pub fn for_street(&self, street: Stage) -> &TierSizing {
        match street {
            Stage::Preflop => &self.preflop,
            Stage::Flop => &self.flop,
            Stage::Turn => &self.turn,
            Stage::River => &self.river,
            Stage::Showdown => &self.showdown,
        }
    }

    fn all(&self) -> [(&'static str, &TierSizing); 5] {
        [
            ("preflop", &self.preflop),
            ("flop", &self.flop),
            ("turn", &self.turn),
            ("river", &self.river),
            ("showdown", &self.showdown),
        ]
    }
}

/// Additive sizing deltas for drawing hands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpliedOdds {
    pub suited_connector_bonus: f64,
    pub set_mining_bonus: f64,
    pub flush_draw_bonus: f64,
    pub straight_draw_bonus: f64,
    pub wet_board_bonus: f64,
    /// Applied as a negative delta on dry boards
    pub dry_board_penalty: f64,
}

impl Default for ImpliedOdds {
    fn default() -> Self {
        Self {
            suited_connector_bonus: 0.06,
            set_mining_bonus: 0.08,
            flush_draw_bonus: 0.1,
            straight_draw_bonus: 0.07,
            wet_board_bonus: 0.05,
            dry_board_penalty: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    /// Cumulative session loss that terminates an automated actor
    pub max_loss: u64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self { max_loss: 5000 }
    }
}

/// Versioned strategy snapshot. Replaced as a whole, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StrategyParams {
    pub version: u64,
    pub spr: SprThresholds,
    pub bet_sizing: BetSizing,
    pub implied_odds: ImpliedOdds,
    pub risk: RiskParams,
}

impl StrategyParams {
    pub fn from_toml_str(s: &str) -> Result<Self, StrategyError> {
        let params: StrategyParams = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: &Path) -> Result<Self, StrategyError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), StrategyError> {
        let spr = &self.spr;
        if !(spr.low >= 0.0 && spr.low <= spr.medium && spr.medium < spr.high) {
            return Err(StrategyError::InvalidValue(
                "spr thresholds must satisfy 0 <= low <= medium < high".to_string(),
            ));
        }
        for (street, sizing) in self.bet_sizing.all() {
            if sizing.values().iter().any(|v| !(0.0..=1.0).contains(v)) {
                return Err(StrategyError::InvalidValue(format!(
                    "bet_sizing.{} values must be within [0, 1]",
                    street
                )));
            }
        }
        let io = &self.implied_odds;
        let bonuses = [
            io.suited_connector_bonus,
            io.set_mining_bonus,
            io.flush_draw_bonus,
            io.straight_draw_bonus,
            io.wet_board_bonus,
            io.dry_board_penalty,
        ];
        if bonuses.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(StrategyError::InvalidValue(
                "implied_odds values must be within [0, 1]".to_string(),
            ));
        }
        if self.risk.max_loss == 0 {
            return Err(StrategyError::InvalidValue(
                "risk.max_loss must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Invalid strategy value: {0}")]
    InvalidValue(String),
    #[error("Failed to parse strategy file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to read strategy file: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-wide strategy holder. Readers get a consistent `Arc` snapshot; writers swap
/// the whole value and bump its version.
#[derive(Debug)]
pub struct StrategyStore {
    current: RwLock<Arc<StrategyParams>>,
}

impl StrategyStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(StrategyParams::default())),
        }
    }

    pub fn with_params(params: StrategyParams) -> Result<Self, StrategyError> {
        params.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(params)),
        })
    }

    pub fn get(&self) -> Arc<StrategyParams> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install `params` as the next version. Returns the version now in effect.
    pub fn replace(&self, mut params: StrategyParams) -> Result<u64, StrategyError> {
        params.validate()?;
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        params.version = guard.version + 1;
        let version = params.version;
        *guard = Arc::new(params);
        tracing::info!(version, "strategy_params_updated");
        Ok(version)
    }

    /// Edit a copy of the current snapshot and install it atomically.
    pub fn update<F>(&self, edit: F) -> Result<u64, StrategyError>
    where
        F: FnOnce(&mut StrategyParams),
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = StrategyParams::clone(&guard);
        edit(&mut next);
        next.validate()?;
        next.version = guard.version + 1;
        let version = next.version;
        *guard = Arc::new(next);
        tracing::info!(version, "strategy_params_updated");
        Ok(version)
    }

    pub fn reset(&self) -> Result<u64, StrategyError> {
        self.replace(StrategyParams::default())
    }
}

impl Default for StrategyStore {
    fn default() -> Self {
        Self::new()
    }
}
