use ante_engine::cards::{parse_cards, Card};
use ante_engine::errors::ErrorCode;
use ante_engine::hand::{determine_winner, HandEvaluator};
use ante_engine::player::Player;

fn hole(s: &str) -> [Card; 2] {
    let c = parse_cards(s).unwrap();
    [c[0], c[1]]
}

fn ids(winners: &[&Player]) -> Vec<String> {
    winners.iter().map(|p| p.id.clone()).collect()
}

#[test]
fn identical_best_five_splits_the_pot() {
    let board = parse_cards("AsAd7c2h3d").unwrap();
    let players = vec![
        Player::with_hole("alice", 100, hole("KcQc")),
        Player::with_hole("bob", 100, hole("KdQd")),
        Player::with_hole("carol", 100, hole("9s8s")),
    ];
    let winners = determine_winner(&players, &board).unwrap();
    assert_eq!(ids(&winners), vec!["alice", "bob"]);
}

#[test]
fn better_kicker_wins_outright() {
    let board = parse_cards("AsAd7c2h3d").unwrap();
    let players = vec![
        Player::with_hole("alice", 100, hole("KcQc")),
        Player::with_hole("bob", 100, hole("KdJd")),
    ];
    let winners = determine_winner(&players, &board).unwrap();
    assert_eq!(ids(&winners), vec!["alice"]);
}

#[test]
fn folded_players_are_ignored() {
    let board = parse_cards("AsAd7c2h3d").unwrap();
    let mut quads = Player::with_hole("alice", 100, hole("AhAc"));
    quads.folded = true;
    let players = vec![
        quads,
        Player::with_hole("bob", 100, hole("KdJd")),
        Player::with_hole("carol", 100, hole("9s8s")),
    ];
    let winners = determine_winner(&players, &board).unwrap();
    assert_eq!(ids(&winners), vec!["bob"]);
}

#[test]
fn last_player_standing_wins_without_cards() {
    let mut a = Player::new("alice", 100);
    a.folded = true;
    let players = vec![a, Player::new("bob", 100)];
    let winners = determine_winner(&players, &[]).unwrap();
    assert_eq!(ids(&winners), vec!["bob"]);
}

#[test]
fn no_active_players_is_an_error() {
    let mut a = Player::new("alice", 100);
    a.folded = true;
    let err = determine_winner(&[a], &[]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidGameState);
}

#[test]
fn cached_evaluator_agrees_on_split() {
    let ev = HandEvaluator::default();
    let board = parse_cards("AsAd7c2h3d").unwrap();
    let players = vec![
        Player::with_hole("alice", 100, hole("KcQc")),
        Player::with_hole("bob", 100, hole("KdQd")),
    ];
    assert_eq!(ids(&ev.determine_winner(&players, &board).unwrap()).len(), 2);
    assert_eq!(ev.cached(), 2);
}
