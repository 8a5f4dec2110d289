mod support;

use ante_engine::cards::full_deck;
use ante_engine::deck::create_deck_from_seed;
use ante_engine::logger::fingerprint;
use ante_engine::player::PlayerAction;
use ante_engine::rng::ShuffleSeed;
use ante_integrity::{GameAction, IntegrityEngine};
use support::capture_logs;
use tracing::Level;

#[test]
fn audit_is_created_on_first_action_and_appended() {
    let engine = IntegrityEngine::default();
    assert!(engine.get_game_audit("g1").is_none());

    engine.log_game_action("g1", &GameAction::new("alice", PlayerAction::Bet(20), 1_000));
    engine.log_game_action("g1", &GameAction::new("bob", PlayerAction::Call(20), 2_000));
    engine.log_game_action("g1", &GameAction::new("alice", PlayerAction::Check, 3_000));

    let audit = engine.get_game_audit("g1").unwrap();
    assert_eq!(audit.players, vec!["alice".to_string(), "bob".to_string()]);
    assert_eq!(audit.actions.len(), 3);
    assert_eq!(audit.actions[1].action, PlayerAction::Call(20));
    assert_eq!(audit.actions[2].timestamp_ms, 3_000);
    assert!(!audit.verified);
    assert!(audit.seed_commitment.is_none());
}

#[test]
fn exported_audit_holds_fingerprints_not_origins() {
    let engine = IntegrityEngine::default();
    let action = GameAction::new("alice", PlayerAction::Fold, 1_000)
        .with_origin("198.51.100.23", "device-42");
    engine.log_game_action("g2", &action);
    engine.log_game_action("g1", &GameAction::new("bob", PlayerAction::Check, 500));

    let json = engine.export_audit_log().unwrap();
    assert!(!json.contains("198.51.100.23"));
    assert!(!json.contains("device-42"));
    assert!(json.contains(&fingerprint("198.51.100.23")));

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["game_id"], "g1");
    assert_eq!(parsed[1]["game_id"], "g2");
    assert_eq!(parsed[1]["actions"][0]["action"], "fold");
}

#[test]
fn game_shuffle_records_commitment_never_seed() {
    let engine = IntegrityEngine::default();
    let seed = ShuffleSeed::from_bytes([9; 32]);
    let deck = create_deck_from_seed(&seed).unwrap();

    assert!(engine.verify_game_shuffle("g1", deck.cards(), &seed));
    let audit = engine.get_game_audit("g1").unwrap();
    assert!(audit.verified);
    assert_eq!(audit.seed_commitment.as_deref(), Some(seed.commitment().as_str()));
    assert!(!engine.export_audit_log().unwrap().contains(&seed.to_hex()));
}

#[test]
fn broken_deck_fails_verification() {
    let engine = IntegrityEngine::default();
    let seed = ShuffleSeed::from_bytes([1; 32]);
    let mut cards = full_deck();
    cards[51] = cards[0];
    assert!(!engine.verify_shuffle(&cards, &seed));
    assert!(!engine.verify_game_shuffle("g1", &cards[..51], &seed));
    assert!(!engine.get_game_audit("g1").unwrap().verified);
}

#[test]
fn replay_checks_order_against_seed() {
    let engine = IntegrityEngine::default();
    let seed = ShuffleSeed::from_bytes([3; 32]);
    let deck = create_deck_from_seed(&seed).unwrap();
    assert!(engine.verify_shuffle_replay(deck.cards(), &seed).unwrap());

    let mut reordered = deck.cards().to_vec();
    reordered.swap(0, 1);
    assert!(!engine.verify_shuffle_replay(&reordered, &seed).unwrap());
}

#[test]
fn shuffle_logs_only_the_seed_fingerprint() {
    let engine = IntegrityEngine::default();
    let seed = ShuffleSeed::from_bytes([7; 32]);
    let deck = create_deck_from_seed(&seed).unwrap();

    let (ok, logs) = capture_logs(|| engine.verify_shuffle(deck.cards(), &seed));
    assert!(ok);
    let events = logs.with_message("shuffle_verified");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("seed"), Some(seed.fingerprint().as_str()));
    for entry in logs.entries() {
        assert!(!entry.rendered().contains(&seed.to_hex()));
    }
}

#[test]
fn flags_log_actor_fingerprints() {
    let engine = IntegrityEngine::default();
    let (_, logs) = capture_logs(|| {
        engine.detect_multi_accounting("alice", "192.0.2.1", "tablet");
        engine.detect_multi_accounting("mallory", "192.0.2.1", "laptop");
    });

    let flags = logs.with_message("anti_cheat_flag");
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].level, Level::WARN);
    assert_eq!(flags[0].field("actor"), Some(fingerprint("mallory").as_str()));
    assert_eq!(flags[0].field("code"), Some("ERR_MULTI_ACCOUNT"));
    for entry in logs.entries() {
        let line = entry.rendered();
        assert!(!line.contains("mallory"));
        assert!(!line.contains("192.0.2.1"));
    }
}

#[test]
fn crossing_the_limit_logs_a_review_event() {
    let engine = IntegrityEngine::default();
    let (_, logs) = capture_logs(|| {
        for _ in 0..4 {
            engine.check_action_speed("bot", 10);
        }
    });
    let review = logs.with_message("anti_cheat_review");
    assert_eq!(review.len(), 1);
    assert_eq!(review[0].level, Level::ERROR);
}
