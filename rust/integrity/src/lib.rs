//! # ante-integrity: Anti-Cheat and Audit
//!
//! Stateful detectors that score actors as they play, plus the server-side action
//! validator and per-game audit trail. Everything is owned by an [`IntegrityEngine`]
//! that tables share through `Arc`.
//!
//! ## Detectors
//!
//! - [`timing`] - Bot-like action rhythm and instant reactions
//! - [`collusion`] - Near-identical VPIP/PFR between active players
//! - [`accounts`] - Several accounts behind one IP or device
//! - [`betting`] - Windows dominated by textbook bet sizes
//! - [`shuffle`] - Deck completeness and seed replay
//!
//! Every flag adds suspicion points; reputation is `100 - suspicion` and an actor is
//! eligible for a ban once suspicion reaches the configured limit.
//!
//! ```rust
//! use ante_integrity::IntegrityEngine;
//!
//! let engine = IntegrityEngine::default();
//! assert!(!engine.detect_multi_accounting("alice", "10.0.0.1", "dev-a"));
//! assert!(engine.detect_multi_accounting("mallory", "10.0.0.1", "dev-m"));
//! assert_eq!(engine.get_player_reputation_score("mallory"), 80);
//! assert_eq!(engine.get_player_reputation_score("alice"), 100);
//! ```

pub mod accounts;
pub mod audit;
pub mod behavior;
pub mod betting;
pub mod collusion;
pub mod config;
pub mod engine;
pub mod shuffle;
pub mod timing;
pub mod validation;

pub use audit::{GameAction, GameAudit};
pub use config::IntegrityConfig;
pub use engine::IntegrityEngine;
pub use validation::ValidationResult;
