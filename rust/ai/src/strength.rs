//! Hand strength on a 0-100 scale.
//!
//! Preflop the score comes from a starting-hand heuristic; from the flop on it is
//! derived from the real evaluation. Both are scaled by table position so late
//! seats play slightly wider.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ante_engine::cache::BoundedCache;
use ante_engine::cards::{Card, Rank};
use ante_engine::errors::GameError;
use ante_engine::hand::{HandEvaluation, evaluate_hand};
use serde::{Deserialize, Serialize};

pub const STRENGTH_CACHE_MAX: usize = 5000;
pub const STRONG_THRESHOLD: u8 = 65;
pub const MODERATE_THRESHOLD: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthTier {
    Weak,
    Moderate,
    Strong,
}

impl StrengthTier {
    pub fn from_score(score: u8) -> Self {
        if score >= STRONG_THRESHOLD {
            StrengthTier::Strong
        } else if score >= MODERATE_THRESHOLD {
            StrengthTier::Moderate
        } else {
            StrengthTier::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strength {
    pub score: u8,
    pub tier: StrengthTier,
    /// Present once three or more community cards are out
    pub evaluation: Option<HandEvaluation>,
}

/// Score `hole` against `community` for a seat at `position` of `total_players`.
pub fn score_strength(
    hole: [Card; 2],
    community: &[Card],
    position: usize,
    total_players: usize,
) -> Result<Strength, GameError> {
    let (base, evaluation) = if community.len() >= 3 {
        let mut cards = hole.to_vec();
        cards.extend_from_slice(community);
        let eval = evaluate_hand(&cards)?;
        let top_kicker = eval.kickers.first().copied().unwrap_or(0) as u32;
        let base = eval.value as u32 * 10 + (top_kicker / 2).min(10);
        (base, Some(eval))
    } else {
        (preflop_base(hole), None)
    };

    let pos_factor =
        (0.85 + (position as f64 / total_players.max(1) as f64) * 0.3).min(1.15);
    let score = (base as f64 * pos_factor).round().clamp(0.0, 100.0) as u8;
    let tier = StrengthTier::from_score(score);

    tracing::debug!(
        score,
        tier = ?tier,
        rank = evaluation.as_ref().map(|e| e.name()).unwrap_or("preflop"),
        position,
        players = total_players,
        "ai_strength"
    );
    Ok(Strength {
        score,
        tier,
        evaluation,
    })
}

fn preflop_base(hole: [Card; 2]) -> u32 {
    let (a, b) = (hole[0].rank, hole[1].rank);
    let mut base = 20;
    if a == b {
        base += match a {
            Rank::Ace => 50,
            Rank::King => 45,
            Rank::Queen => 40,
            Rank::Jack => 35,
            Rank::Ten => 30,
            _ => 20,
        };
        return base;
    }

    let premium = [a, b].iter().filter(|r| **r >= Rank::Jack).count() as u32;
    base += premium * 10;
    if hole[0].suit == hole[1].suit {
        base += 5;
    }
    let gap = a.value().abs_diff(b.value());
    base += match gap {
        1 => 6,
        2 => 3,
        _ => 0,
    };
    if gap <= 1 && a.is_broadway() && b.is_broadway() {
        base += 8;
    }
    base
}

type StrengthKey = (u64, u64, usize, usize);

fn mask(cards: &[Card]) -> u64 {
    cards.iter().fold(0u64, |m, c| m | (1u64 << c.index()))
}

/// [`score_strength`] behind a bounded memo table keyed by card sets and seat.
#[derive(Debug)]
pub struct StrengthScorer {
    cache: Mutex<BoundedCache<StrengthKey, Strength>>,
}

impl Default for StrengthScorer {
    fn default() -> Self {
        Self::new(STRENGTH_CACHE_MAX)
    }
}

impl StrengthScorer {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(BoundedCache::new(capacity)),
        }
    }

    pub fn score(
        &self,
        hole: [Card; 2],
        community: &[Card],
        position: usize,
        total_players: usize,
    ) -> Result<Strength, GameError> {
        let key = (mask(&hole), mask(community), position, total_players);
        if let Some(hit) = self.lock().get(&key) {
            return Ok(hit);
        }
        let strength = score_strength(hole, community, position, total_players)?;
        self.lock().insert(key, strength.clone());
        Ok(strength)
    }

    pub fn cached(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, BoundedCache<StrengthKey, Strength>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
