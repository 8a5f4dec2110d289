//! `ante sim`: bot-vs-bot hands driven the way a table server would drive them.
//!
//! Every hand gets its own seed derived from the run seed. Each proposed action goes
//! through the integrity validator before it is applied; rejected proposals are
//! replaced by the safest legal action. Stacks carry over between hands, session
//! losses feed the risk manager, and banned or busted seats sit out.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;

use ante_ai::bot::BotLevel;
use ante_ai::decision::DecisionEngine;
use ante_ai::opponent::PrevAction;
use ante_ai::{AIOpponent, HeuristicAI};
use ante_engine::deck::create_deck_from_seed;
use ante_engine::errors::{ErrorCode, GameError};
use ante_engine::game::{GameState, Stage};
use ante_engine::hand::HandEvaluator;
use ante_engine::player::{ActionKind, Player, PlayerAction};
use ante_engine::rng::{ShuffleSeed, generate_secure_seed};
use ante_integrity::collusion::CollusionPair;
use ante_integrity::{GameAction, IntegrityEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::{self, validate_players};
use crate::error::CliError;

/// Aggressive actions allowed per street before further raises become calls.
const MAX_RAISES_PER_STREET: usize = 4;
/// Attempts to find an acceptable action before the hand is abandoned.
const MAX_SUBMISSIONS: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct SeatSummary {
    pub id: String,
    pub chips: u64,
    pub reputation: u32,
    pub flags: usize,
    pub banned: bool,
    pub risk_terminated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub hands_requested: u64,
    pub hands_played: u64,
    pub players: usize,
    pub bot_level: BotLevel,
    /// Commitment of the run seed; per-hand seeds derive from it
    pub seed_commitment: String,
    pub showdowns: u64,
    pub actions: u64,
    pub rejected_actions: u64,
    pub verified_shuffles: u64,
    pub total_chips: u64,
    pub seats: Vec<SeatSummary>,
    pub collusion_pairs: Vec<CollusionPair>,
    pub generated_at: String,
}

struct Table {
    ai: HeuristicAI,
    integrity: IntegrityEngine,
    evaluator: HandEvaluator,
    level: BotLevel,
    rng: ChaCha8Rng,
    big_blind: u64,
    /// Virtual milliseconds since the run started
    clock: i64,
    stacks: BTreeMap<String, u64>,
    showdowns: u64,
    actions: u64,
    rejected: u64,
    verified: u64,
}

/// Per-street betting bookkeeping.
#[derive(Default)]
struct Street {
    acted: HashSet<String>,
    raises: usize,
    last_aggression: Option<PrevAction>,
}

/// Per-hand VPIP/PFR bookkeeping.
#[derive(Default)]
struct Participation {
    voluntary: HashSet<String>,
    raised: HashSet<String>,
}

pub fn handle_sim_command(
    hands: u64,
    players: Option<usize>,
    seed: Option<String>,
    level: Option<BotLevel>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut cfg = config::load()?;
    if seed.is_some() {
        cfg.seed = seed;
    }
    let players = players.unwrap_or(cfg.players);
    validate_players(players)?;
    if hands == 0 {
        return Err(CliError::InvalidInput("hands must be >0".into()));
    }
    let seed = match cfg.shuffle_seed()? {
        Some(s) => s,
        None => generate_secure_seed()?,
    };

    let engine = DecisionEngine::default();
    engine
        .strategy()
        .update(|p| p.risk.max_loss = cfg.max_session_loss)
        .map_err(|e| CliError::Config(e.to_string()))?;

    let mut table = Table {
        ai: HeuristicAI::new(engine),
        integrity: IntegrityEngine::default(),
        evaluator: HandEvaluator::default(),
        level: level.unwrap_or(cfg.bot_level),
        rng: ChaCha8Rng::from_seed(*seed.derive(u64::MAX).as_bytes()),
        big_blind: cfg.big_blind,
        clock: 0,
        stacks: (1..=players)
            .map(|i| (format!("bot-{}", i), cfg.starting_stack))
            .collect(),
        showdowns: 0,
        actions: 0,
        rejected: 0,
        verified: 0,
    };

    tracing::info!(
        hands,
        players,
        level = %table.level,
        seed = %seed.fingerprint(),
        "sim_started"
    );
    let mut played = 0;
    for hand in 0..hands {
        if !table.play_hand(hand, &seed.derive(hand))? {
            tracing::info!(hand, "sim_stopped_short_handed");
            break;
        }
        played += 1;
    }

    let summary = table.summarize(hands, played, players, &seed);
    let json_str = serde_json::to_string_pretty(&summary).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

impl Table {
    /// Seats still in the game, in seat order.
    fn eligible(&self) -> Vec<(String, u64)> {
        self.stacks
            .iter()
            .filter(|(id, chips)| **chips > 0 && !self.integrity.should_ban_player(id))
            .map(|(id, chips)| (id.clone(), *chips))
            .collect()
    }

    /// Play one hand. Returns `false` when fewer than two seats can play.
    fn play_hand(&mut self, hand: u64, seed: &ShuffleSeed) -> Result<bool, CliError> {
        let seated = self.eligible();
        if seated.len() < 2 {
            return Ok(false);
        }
        let game_id = format!("sim-{:05}", hand);
        let button = (hand as usize) % seated.len();
        let players: Vec<Player> = seated
            .iter()
            .enumerate()
            .map(|(i, (id, chips))| {
                let mut p = Player::new(id.clone(), *chips);
                p.is_dealer = i == button;
                p
            })
            .collect();
        let mut state = GameState::new(
            game_id.clone(),
            players,
            self.big_blind / 2,
            self.big_blind,
        );

        let mut deck = create_deck_from_seed(seed)?;
        if self.integrity.verify_game_shuffle(&game_id, deck.cards(), seed) {
            self.verified += 1;
        }
        state.deal_hole_cards(&mut deck)?;
        state.post_blinds()?;

        let mut seen = Participation::default();
        loop {
            self.betting_round(&mut state, &mut seen)?;
            if state.active_players().len() <= 1 || state.stage == Stage::River {
                break;
            }
            state.advance_stage(&mut deck)?;
        }
        // board runs out once betting is closed
        while state.active_players().len() > 1 && state.stage != Stage::Showdown {
            state.advance_stage(&mut deck)?;
        }

        if state.active_players().len() > 1 {
            self.showdowns += 1;
        }
        let winners = state.settle_showdown(&self.evaluator)?;

        for p in &state.players {
            let before = self.stacks.get(&p.id).copied().unwrap_or(0);
            if p.chips < before {
                let loss = (before - p.chips) as i64;
                self.ai.engine().record_loss(&p.id, loss);
            }
            self.stacks.insert(p.id.clone(), p.chips);
            self.integrity.record_hand_stats(
                &p.id,
                seen.voluntary.contains(&p.id),
                seen.raised.contains(&p.id),
            );
        }
        tracing::debug!(
            game = %game_id,
            winners = winners.len(),
            board = state.community_cards.len(),
            "sim_hand_finished"
        );
        Ok(true)
    }

    fn betting_round(
        &mut self,
        state: &mut GameState,
        seen: &mut Participation,
    ) -> Result<(), CliError> {
        let mut street = Street::default();
        while !round_closed(state, &street) {
            let actor_id = state.current_turn.clone();
            let Some(actor) = state.player(&actor_id) else {
                return Err(
                    GameError::new(ErrorCode::InvalidGameState, "Turn holder is not seated").into(),
                );
            };
            if actor.folded || actor.chips == 0 {
                // an all-in blind can be left holding the turn; it has nothing to decide
                state.apply_action(&actor_id, PlayerAction::Check, self.clock)?;
                street.acted.insert(actor_id);
                continue;
            }

            let prev = street
                .last_aggression
                .clone()
                .filter(|p| p.actor_id != actor_id);
            let mut proposed = self.ai.get_action(state, &actor_id, prev.as_ref())?;
            let to_call = state.amount_to_call(&actor_id);
            if street.raises >= MAX_RAISES_PER_STREET && proposed.kind().is_aggressive() {
                proposed = passive(to_call, actor.chips);
            }

            let think = self.level.think_time_ms(&mut self.rng) as i64;
            self.clock += think;
            let action = self.submit(state, &actor_id, proposed)?;

            let speed = self.integrity.check_action_speed(&actor_id, think);
            if !speed.valid {
                tracing::debug!(reason = ?speed.reason, "sim_instant_action");
            }
            self.integrity.analyze_action_timing(&actor_id, action.timestamp_ms);
            if let Some(amount) = action.action.amount() {
                if action.action.kind().is_aggressive() {
                    self.integrity.analyze_betting_pattern(&actor_id, amount, state.pot);
                }
            }
            self.integrity.log_game_action(&state.id, &action);
            self.ai
                .engine()
                .opponents()
                .record_action(&actor_id, action.action.kind(), prev.as_ref());

            state.apply_action(&actor_id, action.action, action.timestamp_ms)?;
            self.actions += 1;

            let kind = action.action.kind();
            if state.stage == Stage::Preflop
                && matches!(kind, ActionKind::Call | ActionKind::Bet | ActionKind::Raise)
            {
                seen.voluntary.insert(actor_id.clone());
                if kind.is_aggressive() {
                    seen.raised.insert(actor_id.clone());
                }
            }
            if kind.is_aggressive() {
                street.raises += 1;
                street.acted.clear();
                street.last_aggression = Some(PrevAction::new(actor_id.clone(), kind));
            }
            street.acted.insert(actor_id);
        }
        Ok(())
    }

    /// Validate `proposed`, falling back to safer actions until one is accepted.
    fn submit(
        &mut self,
        state: &GameState,
        actor_id: &str,
        proposed: PlayerAction,
    ) -> Result<GameAction, CliError> {
        let player = state
            .player(actor_id)
            .ok_or_else(|| GameError::new(ErrorCode::InvalidGameState, "Actor is not seated"))?;
        let to_call = state.amount_to_call(actor_id);
        let mut action = GameAction::new(actor_id, proposed, self.clock);

        for _ in 0..MAX_SUBMISSIONS {
            let verdict = self.integrity.validate_action(&action, state, player);
            if verdict.valid {
                return Ok(action);
            }
            self.rejected += 1;
            tracing::debug!(
                code = ?verdict.code,
                reason = ?verdict.reason,
                proposed = ?action.action.kind(),
                "sim_action_rejected"
            );
            match verdict.code {
                Some(ErrorCode::ActionTooFast) => {
                    // wait out the floor and resubmit the same action
                    self.clock =
                        state.last_action_time + self.integrity.config().min_action_interval_ms;
                    action.timestamp_ms = self.clock;
                }
                Some(ErrorCode::InvalidTurn) => {
                    return Err(
                        GameError::new(ErrorCode::InvalidTurn, "Turn order out of sync").into(),
                    );
                }
                _ => action.action = fallback(action.action, to_call, player.chips),
            }
        }
        Err(GameError::new(ErrorCode::InvalidAction, "No acceptable action found").into())
    }

    fn summarize(
        &self,
        requested: u64,
        played: u64,
        players: usize,
        seed: &ShuffleSeed,
    ) -> SimSummary {
        // pairs are scored once over every seat still holding chips
        let remaining: Vec<Player> = self
            .stacks
            .iter()
            .filter(|(_, chips)| **chips > 0)
            .map(|(id, chips)| Player::new(id.clone(), *chips))
            .collect();
        let collusion_pairs = if remaining.len() >= 2 {
            let final_table = GameState::new("sim-final", remaining, 0, 0);
            self.integrity.detect_collusion(&final_table)
        } else {
            Vec::new()
        };

        let risk = self.ai.engine().risk();
        let seats = self
            .stacks
            .iter()
            .map(|(id, chips)| SeatSummary {
                id: id.clone(),
                chips: *chips,
                reputation: self.integrity.get_player_reputation_score(id),
                flags: self.integrity.behavior(id).map_or(0, |b| b.flag_count as usize),
                banned: self.integrity.should_ban_player(id),
                risk_terminated: risk.is_terminated(id),
            })
            .collect();

        SimSummary {
            hands_requested: requested,
            hands_played: played,
            players,
            bot_level: self.level,
            seed_commitment: seed.commitment(),
            showdowns: self.showdowns,
            actions: self.actions,
            rejected_actions: self.rejected,
            verified_shuffles: self.verified,
            total_chips: self.stacks.values().sum(),
            seats,
            collusion_pairs,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A betting round closes when nobody who can still act owes a decision: every seat
/// with chips has acted since the last aggression and matched the highest bet.
fn round_closed(state: &GameState, street: &Street) -> bool {
    let live: Vec<&Player> = state.active_players();
    if live.len() <= 1 {
        return true;
    }
    let highest = state.highest_bet();
    let can_act: Vec<&&Player> = live.iter().filter(|p| p.chips > 0).collect();
    if can_act.len() <= 1 {
        // a lone stack behind all-in players only acts if it is short of the bet
        return can_act.first().is_none_or(|p| p.bet >= highest);
    }
    can_act
        .iter()
        .all(|p| street.acted.contains(&p.id) && p.bet >= highest)
}

fn passive(to_call: u64, chips: u64) -> PlayerAction {
    if to_call == 0 {
        PlayerAction::Check
    } else {
        PlayerAction::Call(to_call.min(chips))
    }
}

/// Next safer action after a rejection: aggression degrades to check/call, a call to
/// a fold.
fn fallback(action: PlayerAction, to_call: u64, chips: u64) -> PlayerAction {
    match action {
        PlayerAction::Fold | PlayerAction::Call(_) => PlayerAction::Fold,
        PlayerAction::Check | PlayerAction::Bet(_) | PlayerAction::Raise(_) => {
            passive(to_call, chips)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_degrades_towards_fold() {
        assert_eq!(fallback(PlayerAction::Bet(3), 0, 100), PlayerAction::Check);
        assert_eq!(fallback(PlayerAction::Raise(3), 20, 100), PlayerAction::Call(20));
        assert_eq!(fallback(PlayerAction::Check, 20, 10), PlayerAction::Call(10));
        assert_eq!(fallback(PlayerAction::Call(20), 20, 100), PlayerAction::Fold);
    }

    #[test]
    fn round_stays_open_until_everyone_has_acted() {
        let mut state = GameState::new(
            "g",
            vec![Player::new("a", 100), Player::new("b", 100)],
            5,
            10,
        );
        let mut street = Street::default();
        assert!(!round_closed(&state, &street));
        street.acted.insert("a".into());
        assert!(!round_closed(&state, &street));
        street.acted.insert("b".into());
        assert!(round_closed(&state, &street));

        state.players[0].bet = 20;
        assert!(!round_closed(&state, &street));
    }

    #[test]
    fn lone_stack_behind_all_in_closes_when_matched() {
        let mut state = GameState::new(
            "g",
            vec![Player::new("a", 0), Player::new("b", 100)],
            5,
            10,
        );
        state.players[0].bet = 50;
        state.players[1].bet = 50;
        assert!(round_closed(&state, &Street::default()));
        state.players[1].bet = 10;
        assert!(!round_closed(&state, &Street::default()));
    }
}
