use std::sync::Arc;

use ante_ai::decision::DecisionEngine;
use ante_ai::opponent::OpponentModel;
use ante_ai::risk::RiskManager;
use ante_ai::strategy::StrategyStore;
use ante_ai::{AIOpponent, HeuristicAI, create_ai};
use ante_engine::cards::{Card, parse_cards};
use ante_engine::errors::ErrorCode;
use ante_engine::game::{GameState, Stage};
use ante_engine::player::{Player, PlayerAction};

fn hole(s: &str) -> [Card; 2] {
    let c = parse_cards(s).unwrap();
    [c[0], c[1]]
}

fn heads_up(hero: &str, villain: &str) -> GameState {
    let mut a = Player::with_hole("hero", 1000, hole(hero));
    a.is_dealer = true;
    let b = Player::with_hole("villain", 1000, hole(villain));
    GameState::new("g", vec![a, b], 5, 10)
}

#[test]
fn factory_builds_heuristic_ai() {
    let ai = create_ai("heuristic").unwrap();
    assert_eq!(ai.name(), "HeuristicAI");
    assert!(create_ai("baseline").is_none());
}

#[test]
fn junk_checks_when_nothing_to_call() {
    let mut gs = heads_up("7c2d", "AhAd");
    gs.pot = 20;
    gs.stage = Stage::Flop;
    gs.community_cards = parse_cards("Ks9s4h").unwrap();
    let ai = HeuristicAI::default();
    assert_eq!(ai.get_action(&gs, "hero", None).unwrap(), PlayerAction::Check);
}

#[test]
fn monster_bets_when_checked_to() {
    let mut gs = heads_up("AhAd", "7c2d");
    gs.pot = 100;
    gs.stage = Stage::Flop;
    gs.community_cards = parse_cards("AsAc4h").unwrap();
    let ai = HeuristicAI::default();
    match ai.get_action(&gs, "hero", None).unwrap() {
        PlayerAction::Bet(a) => assert!(a > 0),
        other => panic!("expected bet, got {:?}", other),
    }
}

#[test]
fn terminated_seat_folds_even_with_quads() {
    let risk = Arc::new(RiskManager::new());
    risk.record_loss("hero", 6000, 5000);
    let ai = HeuristicAI::new(DecisionEngine::new(
        Arc::new(StrategyStore::new()),
        Arc::new(OpponentModel::new()),
        risk,
    ));
    let mut gs = heads_up("AhAd", "7c2d");
    gs.pot = 100;
    gs.stage = Stage::Flop;
    gs.community_cards = parse_cards("AsAc4h").unwrap();
    assert_eq!(ai.get_action(&gs, "hero", None).unwrap(), PlayerAction::Fold);
}

#[test]
fn unknown_seat_and_missing_cards_are_errors() {
    let ai = HeuristicAI::default();
    let gs = heads_up("AhAd", "7c2d");
    assert_eq!(
        ai.get_action(&gs, "nobody", None).unwrap_err().code,
        ErrorCode::InvalidGameState
    );
    let bare = GameState::new("g", vec![Player::new("a", 10), Player::new("b", 10)], 5, 10);
    assert_eq!(
        ai.get_action(&bare, "a", None).unwrap_err().code,
        ErrorCode::InvalidGameState
    );
}
