use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::{ErrorCode, GameError};
use crate::hand::{compare_hands, HandEvaluation, HandEvaluator};
use crate::player::{Player, PlayerAction};

pub const HOLE_CARDS_PER_PLAYER: usize = 2;
pub const FLOP_CARDS: usize = 3;
pub const TURN_CARDS: usize = 1;
pub const RIVER_CARDS: usize = 1;

/// Betting street of a hand. `Showdown` is terminal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
    Showdown,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Preflop,
        Stage::Flop,
        Stage::Turn,
        Stage::River,
        Stage::Showdown,
    ];

    /// One step forward, clamped at `Showdown`.
    pub fn next(self) -> Stage {
        match self {
            Stage::Preflop => Stage::Flop,
            Stage::Flop => Stage::Turn,
            Stage::Turn => Stage::River,
            Stage::River | Stage::Showdown => Stage::Showdown,
        }
    }

    /// Community cards dealt when entering this stage (burn card excluded).
    pub fn cards_to_deal(self) -> usize {
        match self {
            Stage::Flop => FLOP_CARDS,
            Stage::Turn => TURN_CARDS,
            Stage::River => RIVER_CARDS,
            Stage::Preflop | Stage::Showdown => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Preflop => "preflop",
            Stage::Flop => "flop",
            Stage::Turn => "turn",
            Stage::River => "river",
            Stage::Showdown => "showdown",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| GameError::invalid_stage(s))
    }
}

/// Advance a stage given by name. Unknown names fail with `ERR_INVALID_STAGE`.
pub fn next_stage(stage: &str) -> Result<Stage, GameError> {
    Ok(stage.parse::<Stage>()?.next())
}

/// Deal two hole cards per player, one card per player per round.
///
/// The deck is checked for `num_players * 2` cards before any card leaves it.
pub fn deal_cards(deck: &mut Deck, num_players: usize) -> Result<Vec<[Card; 2]>, GameError> {
    if num_players == 0 {
        return Err(GameError::new(
            ErrorCode::InvalidGameState,
            "Number of players must be positive",
        ));
    }
    let needed = num_players * HOLE_CARDS_PER_PLAYER;
    deck.ensure_remaining(needed)?;

    let mut first = Vec::with_capacity(num_players);
    let mut hands = Vec::with_capacity(num_players);
    for _ in 0..num_players {
        first.push(draw(deck)?);
    }
    for c in first {
        hands.push([c, draw(deck)?]);
    }

    tracing::debug!(
        players = num_players,
        cards_dealt = needed,
        deck_remaining = deck.len(),
        "cards_dealt"
    );
    Ok(hands)
}

/// Burn one card, then deal the community cards for `stage`.
///
/// Preflop and showdown deal nothing and burn nothing. The deck is left untouched
/// when it cannot cover burn plus deal.
pub fn deal_community_cards(deck: &mut Deck, stage: Stage) -> Result<Vec<Card>, GameError> {
    let num_cards = stage.cards_to_deal();
    if num_cards == 0 {
        return Ok(Vec::new());
    }
    deck.ensure_remaining(num_cards + 1)
        .map_err(|e| e.with_meta("stage", stage.as_str()))?;

    deck.burn_card();
    let mut cards = Vec::with_capacity(num_cards);
    for _ in 0..num_cards {
        cards.push(draw(deck)?);
    }

    tracing::debug!(
        stage = %stage,
        cards_dealt = num_cards,
        deck_remaining = deck.len(),
        "community_cards_dealt"
    );
    Ok(cards)
}

fn draw(deck: &mut Deck) -> Result<Card, GameError> {
    deck.deal_card()
        .ok_or_else(|| GameError::deck_exhausted(1, 0))
}

/// Share of the final pot the caller must put in: `to_call / (pot + to_call)`.
pub fn pot_odds(pot: u64, to_call: u64) -> f64 {
    if to_call == 0 {
        return 0.0;
    }
    to_call as f64 / (pot + to_call) as f64
}

/// One layer of the pot and the live seats that covered it, in seat order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidePot {
    pub amount: u64,
    pub eligible: Vec<String>,
}

/// State of one hand, owned by the game loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub id: String,
    pub pot: u64,
    pub community_cards: Vec<Card>,
    pub players: Vec<Player>,
    /// Id of the actor whose turn it is
    pub current_turn: String,
    pub stage: Stage,
    pub small_blind: u64,
    pub big_blind: u64,
    /// Unix millis of the last applied action
    pub last_action_time: i64,
}

impl GameState {
    pub fn new(
        id: impl Into<String>,
        players: Vec<Player>,
        small_blind: u64,
        big_blind: u64,
    ) -> Self {
        let current_turn = players.first().map(|p| p.id.clone()).unwrap_or_default();
        let mut gs = Self {
            id: id.into(),
            pot: 0,
            community_cards: Vec::with_capacity(5),
            players,
            current_turn,
            stage: Stage::Preflop,
            small_blind,
            big_blind,
            last_action_time: 0,
        };
        gs.sync_turn_flags();
        gs
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn active_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| !p.folded).collect()
    }

    pub fn highest_bet(&self) -> u64 {
        self.players.iter().map(|p| p.bet).max().unwrap_or(0)
    }

    pub fn amount_to_call(&self, id: &str) -> u64 {
        self.player(id)
            .map(|p| self.highest_bet().saturating_sub(p.bet))
            .unwrap_or(0)
    }

    /// Seat index of `id`, if seated.
    pub fn seat_of(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Deal hole cards to every seated player.
    pub fn deal_hole_cards(&mut self, deck: &mut Deck) -> Result<(), GameError> {
        let hands = deal_cards(deck, self.players.len())?;
        for (p, hand) in self.players.iter_mut().zip(hands) {
            p.clear_cards();
            for c in hand {
                p.give_card(c)
                    .map_err(|e| GameError::new(ErrorCode::InvalidGameState, e))?;
            }
        }
        Ok(())
    }

    /// Post small and big blinds from the two seats after the dealer (heads-up: the
    /// dealer posts the small blind). Turn passes to the seat after the big blind.
    pub fn post_blinds(&mut self) -> Result<(), GameError> {
        let n = self.players.len();
        if n < 2 {
            return Err(GameError::new(
                ErrorCode::InvalidGameState,
                "At least two players are needed to post blinds",
            ));
        }
        let dealer = self.players.iter().position(|p| p.is_dealer).unwrap_or(0);
        let (sb, bb) = if n == 2 {
            (dealer, (dealer + 1) % n)
        } else {
            ((dealer + 1) % n, (dealer + 2) % n)
        };
        for (seat, amount) in [(sb, self.small_blind), (bb, self.big_blind)] {
            let p = &mut self.players[seat];
            let amount = amount.min(p.chips);
            p.commit(amount)
                .map_err(|e| GameError::new(ErrorCode::InsufficientChips, e))?;
            self.pot += amount;
        }
        self.current_turn = self.players[(bb + 1) % n].id.clone();
        self.sync_turn_flags();
        Ok(())
    }

    /// Apply an already validated action for the current actor and pass the turn.
    pub fn apply_action(
        &mut self,
        actor_id: &str,
        action: PlayerAction,
        now_ms: i64,
    ) -> Result<(), GameError> {
        let seat = self.seat_of(actor_id).ok_or_else(|| {
            GameError::new(ErrorCode::InvalidAction, "Unknown actor").with_meta("actor_id", actor_id)
        })?;
        match action {
            PlayerAction::Fold => self.players[seat].folded = true,
            PlayerAction::Check => {}
            PlayerAction::Call(amount) | PlayerAction::Bet(amount) | PlayerAction::Raise(amount) => {
                self.players[seat]
                    .commit(amount)
                    .map_err(|e| GameError::new(ErrorCode::InsufficientChips, e))?;
                self.pot += amount;
            }
        }
        self.last_action_time = now_ms;
        self.pass_turn(seat);
        Ok(())
    }

    /// Move to the next street: deal its community cards and reset street bets.
    pub fn advance_stage(&mut self, deck: &mut Deck) -> Result<Stage, GameError> {
        let next = self.stage.next();
        let cards = deal_community_cards(deck, next)?;
        self.community_cards.extend(cards);
        self.stage = next;
        for p in &mut self.players {
            p.bet = 0;
        }
        let dealer = self.players.iter().position(|p| p.is_dealer).unwrap_or(0);
        self.pass_turn(dealer);
        Ok(next)
    }

    /// Split the whole pot evenly among `winner_ids`; odd chips go to the earliest seat.
    ///
    /// This is a single pot: winners take chips they never covered. Use
    /// [`GameState::settle_showdown`] when anyone is all in.
    pub fn award_pot(&mut self, winner_ids: &[String]) -> Result<(), GameError> {
        let seats: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| winner_ids.contains(&p.id))
            .map(|(i, _)| i)
            .collect();
        if seats.is_empty() {
            return Err(GameError::new(
                ErrorCode::InvalidGameState,
                "Cannot award pot without winners",
            ));
        }
        let share = self.pot / seats.len() as u64;
        let mut remainder = self.pot % seats.len() as u64;
        for seat in seats {
            let extra = if remainder > 0 {
                remainder -= 1;
                1
            } else {
                0
            };
            self.players[seat].add_chips(share + extra);
        }
        self.pot = 0;
        Ok(())
    }

    /// Layer the pot by hand contributions, smallest live stake first.
    ///
    /// Each layer is contested by the live seats that put in at least its level.
    /// Folded chips stay in the layers they reached; chips above every other live
    /// stake form a layer only their owner can win back. Pot chips not tracked as a
    /// contribution join the main pot.
    pub fn side_pots(&self) -> Vec<SidePot> {
        let mut levels: Vec<u64> = self
            .players
            .iter()
            .filter(|p| !p.folded)
            .map(|p| p.contributed)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let eligible = |level: u64| -> Vec<String> {
            self.players
                .iter()
                .filter(|p| !p.folded && p.contributed >= level)
                .map(|p| p.id.clone())
                .collect()
        };
        let tracked: u64 = self.players.iter().map(|p| p.contributed).sum();
        let mut untracked = self.pot.saturating_sub(tracked);
        let top = levels.last().copied().unwrap_or(0);

        let mut pots = Vec::new();
        let mut prev = 0;
        for &level in &levels {
            let mut amount: u64 = self
                .players
                .iter()
                .map(|p| p.contributed.min(level) - p.contributed.min(prev))
                .sum();
            if level == top {
                amount += self
                    .players
                    .iter()
                    .map(|p| p.contributed.saturating_sub(top))
                    .sum::<u64>();
            }
            amount += std::mem::take(&mut untracked);
            if amount > 0 {
                pots.push(SidePot {
                    amount,
                    eligible: eligible(level),
                });
            }
            prev = level;
        }
        pots
    }

    /// Award every layer of [`GameState::side_pots`] to the best live hand among its
    /// eligible seats. Ties split, odd chips to the earliest seat. Returns every seat
    /// that won chips, in seat order.
    pub fn settle_showdown(
        &mut self,
        evaluator: &HandEvaluator,
    ) -> Result<Vec<String>, GameError> {
        let live: Vec<usize> = (0..self.players.len())
            .filter(|&i| !self.players[i].folded)
            .collect();
        if live.is_empty() {
            return Err(GameError::new(
                ErrorCode::InvalidGameState,
                "No active players in game",
            ));
        }

        let mut evaluations: Vec<Option<HandEvaluation>> = vec![None; self.players.len()];
        if live.len() > 1 {
            for &seat in &live {
                let mut cards = self.players[seat].hole_cards();
                cards.extend_from_slice(&self.community_cards);
                evaluations[seat] = Some(evaluator.evaluate(&cards)?);
            }
        }

        let mut won = vec![false; self.players.len()];
        for pot in self.side_pots() {
            let seats: Vec<usize> = pot
                .eligible
                .iter()
                .filter_map(|id| self.seat_of(id))
                .collect();
            let best = seats
                .iter()
                .filter_map(|&s| evaluations[s].as_ref())
                .max_by(|a, b| compare_hands(a, b))
                .cloned();
            let winners: Vec<usize> = match best {
                Some(best) => seats
                    .into_iter()
                    .filter(|&s| {
                        evaluations[s]
                            .as_ref()
                            .is_some_and(|e| compare_hands(e, &best).is_eq())
                    })
                    .collect(),
                None => seats,
            };
            if winners.is_empty() {
                continue;
            }
            let share = pot.amount / winners.len() as u64;
            let mut remainder = pot.amount % winners.len() as u64;
            for seat in winners {
                let extra = if remainder > 0 {
                    remainder -= 1;
                    1
                } else {
                    0
                };
                self.players[seat].add_chips(share + extra);
                won[seat] = true;
            }
        }
        self.pot = 0;

        let winners: Vec<String> = self
            .players
            .iter()
            .zip(won)
            .filter(|(_, w)| *w)
            .map(|(p, _)| p.id.clone())
            .collect();
        tracing::debug!(winners = winners.len(), "pot_settled");
        Ok(winners)
    }

    fn pass_turn(&mut self, from_seat: usize) {
        let n = self.players.len();
        for step in 1..=n {
            let seat = (from_seat + step) % n;
            let p = &self.players[seat];
            if !p.folded && p.chips > 0 {
                self.current_turn = p.id.clone();
                break;
            }
        }
        self.sync_turn_flags();
    }

    fn sync_turn_flags(&mut self) {
        let current = self.current_turn.clone();
        for p in &mut self.players {
            p.is_turn = p.id == current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_parses_lowercase_names() {
        assert_eq!("turn".parse::<Stage>().unwrap(), Stage::Turn);
        assert!("Turn".parse::<Stage>().is_err());
    }

    #[test]
    fn pot_odds_is_zero_without_bet() {
        assert_eq!(pot_odds(100, 0), 0.0);
        assert!((pot_odds(100, 50) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn award_pot_gives_odd_chip_to_first_seat() {
        let mut gs = GameState::new(
            "g",
            vec![Player::new("a", 0), Player::new("b", 0), Player::new("c", 0)],
            5,
            10,
        );
        gs.pot = 101;
        gs.award_pot(&["a".to_string(), "c".to_string()]).unwrap();
        assert_eq!(gs.players[0].chips, 51);
        assert_eq!(gs.players[2].chips, 50);
        assert_eq!(gs.pot, 0);
    }
}
