//! # ante-ai: Automated Opponents
//!
//! Strength scoring, bet sizing and the stores that shape them: a versioned strategy
//! snapshot, a per-actor opponent model and per-session loss caps.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for AI decision-making
//! - [`HeuristicAI`] - Strength tiers plus SPR-aware sizing
//! - [`strength`] - 0-100 hand strength with tiering
//! - [`decision`] - Betting policy, board texture and implied odds
//! - [`opponent`] - Observed aggression and check-raise frequency
//! - [`risk`] - Session loss tracking and termination
//! - [`strategy`] - Strategy parameters and their store
//! - [`bot`] - Think-time pacing levels
//!
//! ## Quick Start
//!
//! ```rust
//! use ante_ai::decision::{DecisionContext, DecisionEngine};
//! use ante_ai::strength::StrengthTier;
//! use ante_engine::game::Stage;
//! use ante_engine::player::PlayerAction;
//!
//! let engine = DecisionEngine::default();
//! let ctx = DecisionContext::new(100, 0, 1000, StrengthTier::Weak, Stage::Flop);
//! assert_eq!(engine.decide_betting(&ctx), PlayerAction::Check);
//! ```

use ante_engine::errors::{ErrorCode, GameError};
use ante_engine::game::GameState;
use ante_engine::player::PlayerAction;

pub mod bot;
pub mod decision;
pub mod opponent;
pub mod risk;
pub mod strategy;
pub mod strength;

use decision::{DecisionContext, DecisionEngine};
use opponent::PrevAction;
use strength::StrengthScorer;

/// Trait defining the interface for AI opponents in poker games.
/// Implementors must provide methods for decision-making and identification.
///
/// # Example Implementation
///
/// ```rust
/// use ante_ai::AIOpponent;
/// use ante_ai::opponent::PrevAction;
/// use ante_engine::errors::GameError;
/// use ante_engine::game::GameState;
/// use ante_engine::player::PlayerAction;
///
/// struct AlwaysCheck;
///
/// impl AIOpponent for AlwaysCheck {
///     fn get_action(
///         &self,
///         _state: &GameState,
///         _player_id: &str,
///         _prev: Option<&PrevAction>,
///     ) -> Result<PlayerAction, GameError> {
///         Ok(PlayerAction::Check)
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysCheck"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// Determine the next action for `player_id`.
    ///
    /// # Arguments
    ///
    /// * `state` - Current hand state
    /// * `player_id` - The seat to act
    /// * `prev` - The action this seat is responding to, if any
    ///
    /// # Errors
    ///
    /// Fails when the seat is unknown, has no hole cards, or the cards are malformed.
    fn get_action(
        &self,
        state: &GameState,
        player_id: &str,
        prev: Option<&PrevAction>,
    ) -> Result<PlayerAction, GameError>;

    /// Return the name/identifier of this AI implementation.
    fn name(&self) -> &str;
}

/// Scores the seat's hand, then lets [`DecisionEngine`] size the action.
///
/// The seat id doubles as its risk session id.
#[derive(Debug, Default)]
pub struct HeuristicAI {
    engine: DecisionEngine,
    scorer: StrengthScorer,
}

impl HeuristicAI {
    pub fn new(engine: DecisionEngine) -> Self {
        Self {
            engine,
            scorer: StrengthScorer::default(),
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }
}

impl AIOpponent for HeuristicAI {
    fn get_action(
        &self,
        state: &GameState,
        player_id: &str,
        prev: Option<&PrevAction>,
    ) -> Result<PlayerAction, GameError> {
        let seat = state.seat_of(player_id).ok_or_else(|| {
            GameError::new(ErrorCode::InvalidGameState, "Unknown player")
                .with_meta("player_id", player_id)
        })?;
        let me = &state.players[seat];
        let hole = me.hole_pair().ok_or_else(|| {
            GameError::new(ErrorCode::InvalidGameState, "Player has no hole cards")
                .with_meta("player_id", player_id)
        })?;

        // 1 = first to act after the dealer, n = the dealer
        let seats = state.players.len();
        let dealer = state.players.iter().position(|p| p.is_dealer).unwrap_or(0);
        let position = (seat + seats - dealer + seats - 1) % seats + 1;
        let strength = self
            .scorer
            .score(hole, &state.community_cards, position, seats)?;

        let active = state.active_players();
        let biggest_other = active
            .iter()
            .filter(|p| p.id != player_id)
            .map(|p| p.chips)
            .max()
            .unwrap_or(me.chips);

        let mut ctx = DecisionContext::new(
            state.pot,
            state.amount_to_call(player_id),
            me.chips,
            strength.tier,
            state.stage,
        );
        ctx.n_players = active.len();
        ctx.effective_stack = Some(me.chips.min(biggest_other));
        ctx.session_id = Some(player_id.to_string());
        ctx.prev_action = prev.cloned();
        ctx.opponent_id = prev.map(|p| p.actor_id.clone());
        ctx.hole = Some(hole);
        ctx.community = state.community_cards.clone();

        Ok(self.engine.decide_betting(&ctx))
    }

    fn name(&self) -> &str {
        "HeuristicAI"
    }
}

/// Factory function to create AI opponents by type string.
///
/// Each call gets fresh strategy, opponent and risk stores; share stores across seats
/// with [`HeuristicAI::new`] instead.
///
/// # Example
///
/// ```rust
/// use ante_ai::create_ai;
///
/// let ai = create_ai("heuristic").unwrap();
/// assert_eq!(ai.name(), "HeuristicAI");
/// assert!(create_ai("oracle").is_none());
/// ```
pub fn create_ai(ai_type: &str) -> Option<Box<dyn AIOpponent>> {
    match ai_type {
        "heuristic" => Some(Box::new(HeuristicAI::default())),
        _ => None,
    }
}
