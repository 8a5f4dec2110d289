use std::cmp::Ordering;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::cache::BoundedCache;
use crate::cards::Card;
use crate::errors::{ErrorCode, GameError};
use crate::player::Player;

pub const MIN_HAND_SIZE: usize = 5;
pub const MAX_HAND_SIZE: usize = 7;
pub const CACHE_MAX_SIZE: usize = 10_000;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum HandRank {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandRank {
    pub fn name(&self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "One Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
            HandRank::RoyalFlush => "Royal Flush",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub rank: HandRank,
    /// 1 (high card) ..= 10 (royal flush); always `rank + 1`.
    pub value: u8,
    // tie-break ranks, high -> low
    pub kickers: Vec<u8>,
}

impl HandEvaluation {
    fn new(rank: HandRank, kickers: Vec<u8>) -> Self {
        Self {
            rank,
            value: rank as u8 + 1,
            kickers,
        }
    }

    pub fn name(&self) -> &'static str {
        self.rank.name()
    }
}

/// Total order: category value first, then kickers lexicographically.
pub fn compare_hands(a: &HandEvaluation, b: &HandEvaluation) -> Ordering {
    match a.value.cmp(&b.value) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

/// Evaluate the best hand available in 5 to 7 cards.
pub fn evaluate_hand(cards: &[Card]) -> Result<HandEvaluation, GameError> {
    card_mask(cards)?;
    Ok(evaluate_unchecked(cards))
}

/// Canonical key: one bit per card, so any ordering of the same cards maps to the same key.
fn card_mask(cards: &[Card]) -> Result<u64, GameError> {
    if cards.len() < MIN_HAND_SIZE || cards.len() > MAX_HAND_SIZE {
        return Err(GameError::invalid_hand_size(cards.len()));
    }
    let mut mask = 0u64;
    for c in cards {
        let bit = 1u64 << c.index();
        if mask & bit != 0 {
            return Err(
                GameError::new(ErrorCode::DuplicateCards, "Duplicate card in hand")
                    .with_meta("card", c.to_string()),
            );
        }
        mask |= bit;
    }
    Ok(mask)
}

fn evaluate_unchecked(cards: &[Card]) -> HandEvaluation {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut rank_mask: u16 = 0;
    let mut suit_counts = [0u8; 4];
    let mut by_suit_mask: [u16; 4] = [0; 4];
    for &c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        let s = c.suit.index();
        suit_counts[s] += 1;
        by_suit_mask[s] |= 1 << r;
    }

    let flush_suit = suit_counts.iter().position(|&n| n >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high_from_mask(by_suit_mask[s]) {
            return if high == 14 {
                HandEvaluation::new(HandRank::RoyalFlush, vec![14])
            } else {
                HandEvaluation::new(HandRank::StraightFlush, vec![high])
            };
        }
    }

    if let Some((quad, kicker)) = detect_quads(&rank_counts) {
        return HandEvaluation::new(HandRank::FourOfAKind, vec![quad, kicker]);
    }

    if let Some((trip, pair)) = detect_full_house(&rank_counts) {
        return HandEvaluation::new(HandRank::FullHouse, vec![trip, pair]);
    }

    if let Some(s) = flush_suit {
        let top: Vec<u8> = ranks_in_mask_desc(by_suit_mask[s]).into_iter().take(5).collect();
        return HandEvaluation::new(HandRank::Flush, top);
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return HandEvaluation::new(HandRank::Straight, vec![high]);
    }

    let (trips, pairs, singles) = classify_multiples(&rank_counts);
    if let Some(&t) = trips.first() {
        let mut k = vec![t];
        k.extend(singles.iter().take(2));
        return HandEvaluation::new(HandRank::ThreeOfAKind, k);
    }
    if pairs.len() >= 2 {
        let (high, low) = (pairs[0], pairs[1]);
        // a third pair can play as the kicker
        let kicker = pairs[2..]
            .iter()
            .chain(singles.iter())
            .copied()
            .max()
            .unwrap_or(0);
        return HandEvaluation::new(HandRank::TwoPair, vec![high, low, kicker]);
    }
    if let Some(&p) = pairs.first() {
        let mut k = vec![p];
        k.extend(singles.iter().take(3));
        return HandEvaluation::new(HandRank::OnePair, k);
    }

    HandEvaluation::new(HandRank::HighCard, singles.into_iter().take(5).collect())
}

fn ranks_in_mask_desc(mask: u16) -> Vec<u8> {
    (2..=14u8).rev().filter(|r| mask & (1 << r) != 0).collect()
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    // Treat Ace as 14 and optionally as 1
    let mut m = mask;
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to 5
    for high in (5..=14u8).rev() {
        let window = 0b11111u16 << (high - 4);
        if (m & window) == window {
            return Some(high);
        }
    }
    None
}

fn detect_quads(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let quad = (2..=14u8).rev().find(|&r| rank_counts[r as usize] == 4)?;
    let kicker = (2..=14u8)
        .rev()
        .find(|&r| r != quad && rank_counts[r as usize] > 0)
        .unwrap_or(0);
    Some((quad, kicker))
}

fn detect_full_house(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let mut trips: Vec<u8> = vec![];
    let mut pairs: Vec<u8> = vec![];
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            _ => {}
        }
    }
    let &trip = trips.first()?;
    // second set of trips plays as the pair
    let pair = trips.get(1).into_iter().chain(pairs.first()).copied().max()?;
    Some((trip, pair))
}

/// Ranks grouped by multiplicity, each group sorted high -> low.
fn classify_multiples(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut trips = vec![];
    let mut pairs = vec![];
    let mut singles = vec![];
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }
    (trips, pairs, singles)
}

/// Every non-folded player tied for the best hand. One active player wins without a
/// showdown; no active players is an invalid state.
pub fn determine_winner<'a>(
    players: &'a [Player],
    community: &[Card],
) -> Result<Vec<&'a Player>, GameError> {
    showdown(players, community, evaluate_hand)
}

fn showdown<'a, F>(
    players: &'a [Player],
    community: &[Card],
    mut eval: F,
) -> Result<Vec<&'a Player>, GameError>
where
    F: FnMut(&[Card]) -> Result<HandEvaluation, GameError>,
{
    let active: Vec<&Player> = players.iter().filter(|p| !p.folded).collect();
    if active.is_empty() {
        return Err(
            GameError::new(ErrorCode::InvalidGameState, "No active players in game")
                .with_meta("seat_count", players.len()),
        );
    }
    if active.len() == 1 {
        return Ok(active);
    }

    let mut evaluations = Vec::with_capacity(active.len());
    for p in active {
        let mut cards = p.hole_cards();
        cards.extend_from_slice(community);
        evaluations.push((p, eval(&cards)?));
    }
    evaluations.sort_by(|a, b| compare_hands(&b.1, &a.1));

    let best = evaluations[0].1.clone();
    let winners: Vec<&Player> = evaluations
        .into_iter()
        .filter(|(_, e)| *e == best)
        .map(|(p, _)| p)
        .collect();
    tracing::debug!(
        winners = winners.len(),
        hand = best.name(),
        "showdown_resolved"
    );
    Ok(winners)
}

/// Evaluator with a bounded memo table keyed by the canonical card set.
#[derive(Debug)]
pub struct HandEvaluator {
    cache: Mutex<BoundedCache<u64, HandEvaluation>>,
}

impl Default for HandEvaluator {
    fn default() -> Self {
        Self::new(CACHE_MAX_SIZE)
    }
}

impl HandEvaluator {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(BoundedCache::new(capacity)),
        }
    }

    pub fn evaluate(&self, cards: &[Card]) -> Result<HandEvaluation, GameError> {
        let key = card_mask(cards)?;
        if let Some(hit) = self.lock().get(&key) {
            return Ok(hit);
        }
        let result = evaluate_unchecked(cards);
        self.lock().insert(key, result.clone());
        Ok(result)
    }

    pub fn determine_winner<'a>(
        &self,
        players: &'a [Player],
        community: &[Card],
    ) -> Result<Vec<&'a Player>, GameError> {
        showdown(players, community, |cards| self.evaluate(cards))
    }

    pub fn cached(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoundedCache<u64, HandEvaluation>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
