//! Bet sizing and action choice for automated actors.
//!
//! The pot fraction to bet starts from the configured sizing for (street, tier) and is
//! shifted additively: up at low SPR, down at high SPR, down in multiway pots, and by
//! the implied-odds bonus when hole cards are known. The sum is clamped once at the end.

use std::sync::Arc;

use ante_engine::cards::Card;
use ante_engine::game::{Stage, pot_odds};
use ante_engine::player::PlayerAction;
use serde::Serialize;

use crate::opponent::{AGGRESSION_PRIOR, OpponentModel, PrevAction, round2};
use crate::risk::{RiskManager, SessionStats};
use crate::strategy::{ImpliedOdds, StrategyStore};
use crate::strength::StrengthTier;

pub const MAX_BET_FRACTION: f64 = 0.95;
/// Pot odds above which a weak hand gives up.
pub const WEAK_CALL_POT_ODDS: f64 = 0.25;
/// Pot odds below which a moderate hand raises instead of calling.
pub const MODERATE_RAISE_POT_ODDS: f64 = 0.3;
/// Opponent aggression above which a check-raise is considered.
pub const CHECK_RAISE_AGGRESSION: f64 = 0.5;

/// Everything the engine needs to decide one turn.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    pub pot: u64,
    pub bet_to_call: u64,
    pub bankroll: u64,
    pub tier: StrengthTier,
    pub street: Stage,
    pub n_players: usize,
    /// Defaults to `bankroll`
    pub effective_stack: Option<u64>,
    pub session_id: Option<String>,
    pub prev_action: Option<PrevAction>,
    pub opponent_id: Option<String>,
    pub hole: Option<[Card; 2]>,
    pub community: Vec<Card>,
}

impl DecisionContext {
    pub fn new(pot: u64, bet_to_call: u64, bankroll: u64, tier: StrengthTier, street: Stage) -> Self {
        Self {
            pot,
            bet_to_call,
            bankroll,
            tier,
            street,
            n_players: 2,
            effective_stack: None,
            session_id: None,
            prev_action: None,
            opponent_id: None,
            hole: None,
            community: Vec::new(),
        }
    }
}

/// Board texture from the suits and rank adjacency of the community cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardTexture {
    /// Fewer than three community cards
    Unknown,
    Dry,
    Semi,
    Wet,
}

pub fn classify_board(community: &[Card]) -> BoardTexture {
    if community.len() < 3 {
        return BoardTexture::Unknown;
    }
    let mut suit_counts = [0u8; 4];
    for c in community {
        suit_counts[c.suit as usize] += 1;
    }
    let flushy = suit_counts.iter().any(|&n| n >= 3);

    let mut ranks: Vec<u8> = community.iter().map(|c| c.rank.value()).collect();
    ranks.sort_unstable();
    let adjacent = ranks.windows(2).filter(|w| w[1] - w[0] == 1).count();
    let straighty = adjacent >= 2;

    match (flushy, straighty) {
        (true, true) => BoardTexture::Wet,
        (true, false) | (false, true) => BoardTexture::Semi,
        (false, false) => BoardTexture::Dry,
    }
}

/// Additive pot-fraction delta for drawing potential.
pub fn implied_odds_bonus(hole: [Card; 2], community: &[Card], params: &ImpliedOdds) -> f64 {
    let [a, b] = hole;
    let suited = a.suit == b.suit;
    let connected = a.rank.value().abs_diff(b.rank.value()) <= 1;
    let mut bonus = 0.0;
    if suited && connected {
        bonus += params.suited_connector_bonus;
    }
    if a.rank == b.rank {
        bonus += params.set_mining_bonus;
    }
    if community.len() >= 3 {
        if community.iter().filter(|c| c.suit == a.suit).count() >= 2 {
            bonus += params.flush_draw_bonus;
        }
        if community.iter().any(|c| c.rank.is_broadway()) {
            bonus += params.straight_draw_bonus;
        }
        match classify_board(community) {
            BoardTexture::Wet => bonus += params.wet_board_bonus,
            BoardTexture::Dry => bonus -= params.dry_board_penalty,
            BoardTexture::Semi | BoardTexture::Unknown => {}
        }
    }
    bonus
}

/// Effective stack over pot, two decimals; infinite for an empty pot.
pub fn compute_spr(pot: u64, effective_stack: u64) -> f64 {
    if pot == 0 {
        return f64::INFINITY;
    }
    round2(effective_stack as f64 / pot as f64)
}

/// Betting policy over shared strategy, opponent and risk stores.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    strategy: Arc<StrategyStore>,
    opponents: Arc<OpponentModel>,
    risk: Arc<RiskManager>,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(
            Arc::new(StrategyStore::new()),
            Arc::new(OpponentModel::new()),
            Arc::new(RiskManager::new()),
        )
    }
}

impl DecisionEngine {
    pub fn new(
        strategy: Arc<StrategyStore>,
        opponents: Arc<OpponentModel>,
        risk: Arc<RiskManager>,
    ) -> Self {
        Self {
            strategy,
            opponents,
            risk,
        }
    }

    pub fn strategy(&self) -> &Arc<StrategyStore> {
        &self.strategy
    }

    pub fn opponents(&self) -> &Arc<OpponentModel> {
        &self.opponents
    }

    pub fn risk(&self) -> &Arc<RiskManager> {
        &self.risk
    }

    /// Add `amount` to the session's loss, capped by the current strategy's
    /// `risk.max_loss`.
    pub fn record_loss(&self, session_id: &str, amount: i64) -> SessionStats {
        let max_loss = self.strategy.get().risk.max_loss;
        self.risk.record_loss(session_id, amount, max_loss)
    }

    /// Choose an action. A terminated risk session always folds.
    pub fn decide_betting(&self, ctx: &DecisionContext) -> PlayerAction {
        if let Some(session) = ctx.session_id.as_deref() {
            self.risk.start_session(session);
            if self.risk.is_terminated(session) {
                tracing::debug!("ai_decision_forced_fold");
                return PlayerAction::Fold;
            }
        }

        let params = self.strategy.get();
        let spr = compute_spr(ctx.pot, ctx.effective_stack.unwrap_or(ctx.bankroll));
        let odds = pot_odds(ctx.pot, ctx.bet_to_call);

        let mut pct = params.bet_sizing.for_street(ctx.street).for_tier(ctx.tier);
        if spr <= params.spr.low {
            pct += 0.1;
        } else if spr >= params.spr.high {
            pct -= 0.1;
        }
        if ctx.n_players > 2 {
            pct -= 0.1;
        }
        if let Some(hole) = ctx.hole {
            pct += implied_odds_bonus(hole, &ctx.community, &params.implied_odds);
        }
        let pct = pct.clamp(0.0, MAX_BET_FRACTION);
        let amount = ctx.bankroll.min(fraction_of(ctx.pot, pct));

        let opp_aggression = ctx
            .opponent_id
            .as_deref()
            .map(|id| self.opponents.get_aggression(id))
            .unwrap_or(AGGRESSION_PRIOR);
        let facing_aggression = ctx
            .prev_action
            .as_ref()
            .is_some_and(|p| p.kind.is_aggressive());
        let should_check_raise = facing_aggression
            && opp_aggression > CHECK_RAISE_AGGRESSION
            && spr <= params.spr.medium;

        let decision = match ctx.tier {
            StrengthTier::Weak => {
                if ctx.bet_to_call == 0 {
                    PlayerAction::Check
                } else if odds > WEAK_CALL_POT_ODDS {
                    PlayerAction::Fold
                } else {
                    self.call(ctx)
                }
            }
            StrengthTier::Moderate => {
                if ctx.bet_to_call == 0 {
                    bet_or_check(amount)
                } else if should_check_raise {
                    let target = fraction_of(ctx.pot, 0.6)
                        .min(ctx.bankroll)
                        .max(ctx.bet_to_call * 3);
                    self.raise(ctx, target)
                } else if odds < MODERATE_RAISE_POT_ODDS {
                    let target = (ctx.bet_to_call * 3).min(ctx.bankroll).max(amount);
                    self.raise(ctx, target)
                } else {
                    self.call(ctx)
                }
            }
            StrengthTier::Strong => {
                if ctx.bet_to_call == 0 {
                    bet_or_check(amount)
                } else {
                    let target = fraction_of(ctx.pot, 0.75)
                        .min(ctx.bankroll)
                        .max(ctx.bet_to_call * 3);
                    self.raise(ctx, target)
                }
            }
        };

        tracing::debug!(
            tier = ?ctx.tier,
            street = %ctx.street,
            spr,
            pot_odds = odds,
            pct,
            action = ?decision.kind(),
            amount = decision.amount().unwrap_or(0),
            "ai_decision"
        );
        decision
    }

    fn call(&self, ctx: &DecisionContext) -> PlayerAction {
        PlayerAction::Call(ctx.bet_to_call.min(ctx.bankroll))
    }

    /// Raise to `target`, capped at the bankroll. A cap that no longer beats the call
    /// becomes a call.
    fn raise(&self, ctx: &DecisionContext, target: u64) -> PlayerAction {
        let target = target.min(ctx.bankroll);
        if target <= ctx.bet_to_call {
            self.call(ctx)
        } else {
            PlayerAction::Raise(target)
        }
    }
}

fn bet_or_check(amount: u64) -> PlayerAction {
    if amount > 0 {
        PlayerAction::Bet(amount)
    } else {
        PlayerAction::Check
    }
}

fn fraction_of(pot: u64, pct: f64) -> u64 {
    (pot as f64 * pct).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ante_engine::cards::parse_cards;

    fn board(s: &str) -> Vec<Card> {
        parse_cards(s).unwrap()
    }

    #[test]
    fn board_texture() {
        assert_eq!(classify_board(&board("AhKh")), BoardTexture::Unknown);
        assert_eq!(classify_board(&board("8h9hTh")), BoardTexture::Wet);
        assert_eq!(classify_board(&board("2h7hKh")), BoardTexture::Semi);
        assert_eq!(classify_board(&board("5c6d7s")), BoardTexture::Semi);
        assert_eq!(classify_board(&board("2c7dKs")), BoardTexture::Dry);
    }

    #[test]
    fn spr_is_infinite_for_empty_pot() {
        assert!(compute_spr(0, 100).is_infinite());
        assert_eq!(compute_spr(300, 1000), 3.33);
    }

    #[test]
    fn pocket_pair_gets_set_mining_bonus() {
        let params = ImpliedOdds::default();
        let hole = [board("7h")[0], board("7d")[0]];
        assert_eq!(implied_odds_bonus(hole, &[], &params), 0.08);
    }

    #[test]
    fn suited_connector_with_flush_draw_on_broadway_board() {
        let params = ImpliedOdds::default();
        let hole = [board("9h")[0], board("8h")[0]];
        let b = implied_odds_bonus(hole, &board("ThJhQc"), &params);
        // suited connector + flush draw + broadway, semi board adds nothing
        assert!((b - (0.06 + 0.1 + 0.07)).abs() < 1e-9);
    }
}
