//! # ante-engine: Card Game Core
//!
//! Card model, secure shuffling, hand evaluation and the street state machine for
//! multi-player Texas Hold'em. Everything here is synchronous and CPU-bound; shared
//! caches are guarded so one evaluator can serve many concurrent games.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), parsing and formatting
//! - [`rng`] - Secure entropy, rejection-sampled integers and seeded replay
//! - [`deck`] - 52-card decks shuffled from the OS CSPRNG or a recorded seed
//! - [`hand`] - Hand evaluation, comparison and winner determination
//! - [`cache`] - Bounded memo table used by the evaluators
//! - [`game`] - Stage transitions, dealing, pot odds and `GameState`
//! - [`player`] - Player state and actions
//! - [`errors`] - Coded, sanitized domain errors
//! - [`logger`] - Metadata sanitizing and fingerprinting for logs
//!
//! ## Quick Start
//!
//! ```rust
//! use ante_engine::cards::parse_cards;
//! use ante_engine::hand::{evaluate_hand, HandRank};
//!
//! let cards = parse_cards("AsKsQsJsTs").unwrap();
//! let eval = evaluate_hand(&cards).unwrap();
//! assert_eq!(eval.rank, HandRank::RoyalFlush);
//! ```
//!
//! ## Replayable Shuffles
//!
//! ```rust
//! use ante_engine::deck::create_deck_from_seed;
//! use ante_engine::rng::ShuffleSeed;
//!
//! let seed = ShuffleSeed::from_bytes([7; 32]);
//! let a = create_deck_from_seed(&seed).unwrap();
//! let b = create_deck_from_seed(&seed).unwrap();
//! assert_eq!(a, b);
//! ```
//!
//! ## Streets
//!
//! ```rust
//! use ante_engine::game::{next_stage, Stage};
//!
//! assert_eq!(next_stage("river").unwrap(), Stage::Showdown);
//! assert!(next_stage("fourth-street").is_err());
//! ```

pub mod cache;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod rng;
