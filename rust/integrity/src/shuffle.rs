use std::collections::HashSet;

use ante_engine::cards::Card;
use ante_engine::deck::{create_deck_from_seed, DECK_SIZE};
use ante_engine::errors::GameError;
use ante_engine::rng::ShuffleSeed;

/// `Err(reason)` unless `cards` is a full deck with no repeated card.
pub fn check_deck(cards: &[Card]) -> Result<(), String> {
    if cards.len() != DECK_SIZE {
        return Err(format!("Deck has {} cards, expected {}", cards.len(), DECK_SIZE));
    }
    let unique: HashSet<&Card> = cards.iter().collect();
    if unique.len() != DECK_SIZE {
        return Err("Deck contains duplicate cards".to_string());
    }
    Ok(())
}

/// Whether `cards` is exactly the order `seed` produces.
pub fn replays_from_seed(cards: &[Card], seed: &ShuffleSeed) -> Result<bool, GameError> {
    let expected = create_deck_from_seed(seed)?;
    Ok(expected.cards() == cards)
}
