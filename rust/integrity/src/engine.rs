//! The stateful integrity engine: one instance shared by every table through `Arc`.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ante_engine::cards::Card;
use ante_engine::errors::{ErrorCode, GameError};
use ante_engine::game::GameState;
use ante_engine::logger::fingerprint;
use ante_engine::player::{Player, PlayerAction};
use ante_engine::rng::ShuffleSeed;

use crate::accounts::AccountRegistry;
use crate::audit::{GameAction, GameAudit};
use crate::behavior::{BetSample, Flag, FlagKind, PlayerBehavior};
use crate::betting::optimal_share;
use crate::collusion::{collusion_score, CollusionPair};
use crate::config::{ConfigError, IntegrityConfig};
use crate::shuffle::{check_deck, replays_from_seed};
use crate::timing::{evaluate_timing, instant_action_reason, TimingVerdict};
use crate::validation::ValidationResult;

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Detectors over per-actor behavior, account ownership and per-game audits.
///
/// Each map sits behind its own mutex and every read-modify-write happens under a
/// single guard. Suspicion only grows; nothing here resets an actor.
#[derive(Debug, Default)]
pub struct IntegrityEngine {
    config: IntegrityConfig,
    behaviors: Mutex<HashMap<String, PlayerBehavior>>,
    accounts: Mutex<AccountRegistry>,
    audits: Mutex<HashMap<String, GameAudit>>,
}

impl IntegrityEngine {
    pub fn new(config: IntegrityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &IntegrityConfig {
        &self.config
    }

    fn behaviors(&self) -> MutexGuard<'_, HashMap<String, PlayerBehavior>> {
        self.behaviors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn audits(&self) -> MutexGuard<'_, HashMap<String, GameAudit>> {
        self.audits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flag(
        &self,
        behaviors: &mut HashMap<String, PlayerBehavior>,
        actor_id: &str,
        kind: FlagKind,
        reason: String,
        at_ms: i64,
    ) {
        let points = self.config.points.for_kind(kind);
        let behavior = behaviors
            .entry(actor_id.to_string())
            .or_insert_with(|| PlayerBehavior::new(actor_id));
        behavior.add_flag(
            Flag {
                kind,
                points,
                reason: reason.clone(),
                at_ms,
            },
            self.config.flag_history,
        );
        let actor = fingerprint(actor_id);
        tracing::warn!(
            actor = %actor,
            code = kind.code().as_str(),
            points,
            suspicion = behavior.suspicion_score,
            reason = %reason,
            "anti_cheat_flag"
        );
        if behavior.suspicion_score >= self.config.suspicion_limit {
            tracing::error!(
                actor = %actor,
                suspicion = behavior.suspicion_score,
                "anti_cheat_review"
            );
        }
    }

    /// Record an action time and score the window. Returns `true` when the actor was
    /// flagged.
    pub fn analyze_action_timing(&self, actor_id: &str, at_ms: i64) -> bool {
        let mut behaviors = self.behaviors();
        let behavior = behaviors
            .entry(actor_id.to_string())
            .or_insert_with(|| PlayerBehavior::new(actor_id));
        behavior.push_timestamp(at_ms, self.config.timing_window);

        match evaluate_timing(&behavior.action_timestamps, &self.config) {
            TimingVerdict::Human => false,
            TimingVerdict::ExactInterval { interval_ms } => {
                let reason = format!("Actions at exact {}ms intervals", interval_ms);
                self.flag(&mut behaviors, actor_id, FlagKind::ExactTiming, reason, at_ms);
                true
            }
            TimingVerdict::LowVariance { variance } => {
                let reason = format!("Timing variance {:.1}ms below threshold", variance);
                self.flag(&mut behaviors, actor_id, FlagKind::BotTiming, reason, at_ms);
                true
            }
        }
    }

    /// Flag reactions faster than a human can manage. The verdict only rejects when
    /// `reject_instant_actions` is set.
    pub fn check_action_speed(&self, actor_id: &str, elapsed_ms: i64) -> ValidationResult {
        let Some(reason) = instant_action_reason(elapsed_ms, &self.config) else {
            return ValidationResult::ok();
        };
        let mut behaviors = self.behaviors();
        self.flag(&mut behaviors, actor_id, FlagKind::InstantAction, reason, now_ms());
        if self.config.reject_instant_actions {
            ValidationResult::reject(ErrorCode::ActionTooFast, "Action too fast")
        } else {
            ValidationResult::ok()
        }
    }

    /// Count one dealt hand for the actor's VPIP/PFR frequencies.
    pub fn record_hand_stats(
        &self,
        actor_id: &str,
        voluntarily_played: bool,
        preflop_raised: bool,
    ) {
        let mut behaviors = self.behaviors();
        let b = behaviors
            .entry(actor_id.to_string())
            .or_insert_with(|| PlayerBehavior::new(actor_id));
        b.hands_seen += 1;
        if voluntarily_played {
            b.vpip_hands += 1;
        }
        if preflop_raised {
            b.pfr_hands += 1;
        }
    }

    /// Compare every pair of non-folded players. Pairs above the threshold are
    /// returned and both members flagged.
    pub fn detect_collusion(&self, state: &GameState) -> Vec<CollusionPair> {
        let active: Vec<&str> = state
            .players
            .iter()
            .filter(|p| !p.folded)
            .map(|p| p.id.as_str())
            .collect();
        let mut behaviors = self.behaviors();
        // unseen actors compare with zeroed stats
        let unseen = PlayerBehavior::new("");
        let mut pairs = Vec::new();
        for (i, first) in active.iter().enumerate() {
            for second in &active[i + 1..] {
                let a = behaviors.get(*first).unwrap_or(&unseen);
                let b = behaviors.get(*second).unwrap_or(&unseen);
                let score = collusion_score(a, b, &self.config);
                if score > self.config.collusion_threshold {
                    pairs.push(CollusionPair {
                        first: first.to_string(),
                        second: second.to_string(),
                        score,
                    });
                }
            }
        }

        let at = now_ms();
        for pair in &pairs {
            let reason = format!("Possible collusion (score {:.2})", pair.score);
            self.flag(&mut behaviors, &pair.first, FlagKind::Collusion, reason.clone(), at);
            self.flag(&mut behaviors, &pair.second, FlagKind::Collusion, reason, at);
        }
        pairs
    }

    /// Register the actor's origin. Returns `true` when the actor was flagged for
    /// sharing an IP or device with an earlier account.
    pub fn detect_multi_accounting(&self, actor_id: &str, ip: &str, device_id: &str) -> bool {
        let owner = self
            .accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .register(actor_id, ip, device_id);
        if owner {
            return false;
        }
        let mut behaviors = self.behaviors();
        self.flag(
            &mut behaviors,
            actor_id,
            FlagKind::MultiAccount,
            "IP or device shared with another account".to_string(),
            now_ms(),
        );
        true
    }

    /// Record a bet into `pot`. Returns `true` when the actor was flagged for a window
    /// dominated by textbook-sized bets.
    pub fn analyze_betting_pattern(&self, actor_id: &str, amount: u64, pot: u64) -> bool {
        let mut behaviors = self.behaviors();
        let behavior = behaviors
            .entry(actor_id.to_string())
            .or_insert_with(|| PlayerBehavior::new(actor_id));
        behavior.push_bet(BetSample { amount, pot }, self.config.bet_window);

        match optimal_share(&behavior.bet_samples, &self.config) {
            Some(share) if share > self.config.optimal_fraction => {
                let reason = format!("{:.0}% of bets sized optimally", share * 100.0);
                self.flag(
                    &mut behaviors,
                    actor_id,
                    FlagKind::OptimalBetting,
                    reason,
                    now_ms(),
                );
                true
            }
            _ => false,
        }
    }

    /// A deck is valid when it holds all 52 distinct cards. Only the seed fingerprint
    /// is ever logged.
    pub fn verify_shuffle(&self, cards: &[Card], seed: &ShuffleSeed) -> bool {
        match check_deck(cards) {
            Ok(()) => {
                tracing::info!(seed = %seed.fingerprint(), "shuffle_verified");
                true
            }
            Err(reason) => {
                tracing::warn!(
                    seed = %seed.fingerprint(),
                    reason = %reason,
                    "shuffle_rejected"
                );
                false
            }
        }
    }

    /// [`Self::verify_shuffle`], recording the seed commitment and verdict on the
    /// game's audit.
    pub fn verify_game_shuffle(&self, game_id: &str, cards: &[Card], seed: &ShuffleSeed) -> bool {
        let verified = self.verify_shuffle(cards, seed);
        let mut audits = self.audits();
        let audit = audits
            .entry(game_id.to_string())
            .or_insert_with(|| GameAudit::new(game_id, now_ms()));
        audit.seed_commitment = Some(seed.commitment());
        audit.verified = verified;
        verified
    }

    /// Whether `cards` is a valid deck in exactly the order `seed` produces.
    pub fn verify_shuffle_replay(
        &self,
        cards: &[Card],
        seed: &ShuffleSeed,
    ) -> Result<bool, GameError> {
        if !self.verify_shuffle(cards, seed) {
            return Ok(false);
        }
        replays_from_seed(cards, seed)
    }

    /// Server-side check of a submitted action against the live state. Submitting too
    /// soon after the previous action also flags the actor.
    pub fn validate_action(
        &self,
        action: &GameAction,
        state: &GameState,
        actor: &Player,
    ) -> ValidationResult {
        if state.current_turn != actor.id || action.actor_id != actor.id {
            return ValidationResult::reject(ErrorCode::InvalidTurn, "Not your turn");
        }
        if actor.folded {
            return ValidationResult::reject(ErrorCode::InvalidAction, "Player has folded");
        }

        let to_call = state.amount_to_call(&actor.id);
        match action.action {
            PlayerAction::Fold => {}
            PlayerAction::Check => {
                if to_call > 0 {
                    return ValidationResult::reject(
                        ErrorCode::InvalidAction,
                        "Cannot check facing a bet",
                    );
                }
            }
            PlayerAction::Call(amount) => {
                if amount > actor.chips {
                    return ValidationResult::reject(
                        ErrorCode::InsufficientChips,
                        "Insufficient chips",
                    );
                }
                // a short-stacked caller goes all in
                if amount != to_call.min(actor.chips) {
                    return ValidationResult::reject(
                        ErrorCode::InvalidBetAmount,
                        "Call must match the amount to call",
                    );
                }
            }
            PlayerAction::Bet(_) if to_call > 0 => {
                return ValidationResult::reject(
                    ErrorCode::InvalidAction,
                    "Cannot bet facing a bet, raise instead",
                );
            }
            PlayerAction::Bet(amount) | PlayerAction::Raise(amount) => {
                if amount == 0 {
                    return ValidationResult::reject(
                        ErrorCode::InvalidBetAmount,
                        "Invalid bet amount",
                    );
                }
                if amount < state.big_blind {
                    return ValidationResult::reject(ErrorCode::BetTooSmall, "Bet too small");
                }
                if amount > actor.chips {
                    return ValidationResult::reject(
                        ErrorCode::InsufficientChips,
                        "Insufficient chips",
                    );
                }
                if matches!(action.action, PlayerAction::Raise(_)) && amount <= to_call {
                    return ValidationResult::reject(
                        ErrorCode::InvalidBetAmount,
                        "Raise must exceed the amount to call",
                    );
                }
            }
        }

        // 0 means no action has been applied yet this hand
        if state.last_action_time > 0 {
            let elapsed = action.timestamp_ms - state.last_action_time;
            if elapsed < self.config.min_action_interval_ms {
                let mut behaviors = self.behaviors();
                self.flag(
                    &mut behaviors,
                    &actor.id,
                    FlagKind::InstantAction,
                    format!("Action {}ms after the previous one", elapsed),
                    action.timestamp_ms,
                );
                return ValidationResult::reject(ErrorCode::ActionTooFast, "Action too fast");
            }
        }
        ValidationResult::ok()
    }

    /// Append to the game's audit, creating it on first use.
    pub fn log_game_action(&self, game_id: &str, action: &GameAction) {
        let mut audits = self.audits();
        let audit = audits
            .entry(game_id.to_string())
            .or_insert_with(|| GameAudit::new(game_id, now_ms()));
        audit.append(action);
        tracing::debug!(
            actions = audit.actions.len(),
            kind = ?action.action.kind(),
            "game_action_logged"
        );
    }

    pub fn get_game_audit(&self, game_id: &str) -> Option<GameAudit> {
        self.audits().get(game_id).cloned()
    }

    /// All audits as pretty JSON, ordered by game id.
    pub fn export_audit_log(&self) -> Result<String, GameError> {
        let audits = self.audits();
        let mut all: Vec<&GameAudit> = audits.values().collect();
        all.sort_by(|a, b| a.game_id.cmp(&b.game_id));
        serde_json::to_string_pretty(&all).map_err(|e| {
            GameError::new(ErrorCode::ServerError, "Failed to serialize audit log")
                .with_meta("error", e.to_string())
        })
    }

    /// 100 minus suspicion, floored at 0. Unknown actors score 100.
    pub fn get_player_reputation_score(&self, actor_id: &str) -> u32 {
        self.behaviors()
            .get(actor_id)
            .map_or(100, PlayerBehavior::reputation)
    }

    pub fn should_ban_player(&self, actor_id: &str) -> bool {
        self.behaviors()
            .get(actor_id)
            .is_some_and(|b| b.suspicion_score >= self.config.suspicion_limit)
    }

    /// Actors at or above the suspicion limit, sorted.
    pub fn suspicious_players(&self) -> BTreeSet<String> {
        self.behaviors()
            .values()
            .filter(|b| b.suspicion_score >= self.config.suspicion_limit)
            .map(|b| b.actor_id.clone())
            .collect()
    }

    pub fn behavior(&self, actor_id: &str) -> Option<PlayerBehavior> {
        self.behaviors().get(actor_id).cloned()
    }
}
