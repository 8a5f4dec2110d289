use std::collections::HashSet;

use crate::cards::{full_deck, Card};
use crate::errors::{ErrorCode, GameError};
use crate::rng::{secure_shuffle, EntropySource, OsEntropy, SeededEntropy, ShuffleSeed};

pub const DECK_SIZE: usize = 52;

/// An ordered pile of unique cards. Cards leave from the end and never come back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Shuffle a fresh 52-card universe with the given entropy source.
    pub fn shuffled_with<E: EntropySource + ?Sized>(src: &mut E) -> Result<Self, GameError> {
        let mut cards = full_deck();
        secure_shuffle(src, &mut cards)?;
        Ok(Self { cards })
    }

    /// Wrap an explicit card order, rejecting duplicates.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, GameError> {
        let mut seen = HashSet::with_capacity(cards.len());
        for c in &cards {
            if !seen.insert(*c) {
                return Err(GameError::new(ErrorCode::DuplicateCards, "Duplicate card in deck")
                    .with_meta("card", c.to_string()));
            }
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Fail with deck exhaustion unless `n` cards remain. Never mutates.
    pub fn ensure_remaining(&self, n: usize) -> Result<(), GameError> {
        if self.cards.len() < n {
            return Err(GameError::deck_exhausted(n, self.cards.len()));
        }
        Ok(())
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn burn_card(&mut self) -> Option<Card> {
        self.cards.pop()
    }
}

/// A full 52-card permutation from the OS CSPRNG.
pub fn create_deck() -> Result<Deck, GameError> {
    Deck::shuffled_with(&mut OsEntropy)
}

/// Deterministic permutation for a recorded seed; replaying the seed reproduces the deck.
pub fn create_deck_from_seed(seed: &ShuffleSeed) -> Result<Deck, GameError> {
    Deck::shuffled_with(&mut SeededEntropy::new(seed))
}
