use ante_engine::cards::{parse_cards, Card};
use ante_engine::errors::ErrorCode;
use ante_engine::hand::{compare_hands, evaluate_hand, HandEvaluator, HandRank};

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).unwrap()
}

#[test]
fn detects_royal_flush() {
    let eval = evaluate_hand(&cards("AsKsQsJsTs")).unwrap();
    assert_eq!(eval.rank, HandRank::RoyalFlush);
    assert_eq!(eval.value, 10);
    assert_eq!(eval.name(), "Royal Flush");
}

#[test]
fn wheel_is_five_high_straight() {
    let eval = evaluate_hand(&cards("Ah2d3c4s5h")).unwrap();
    assert_eq!(eval.rank, HandRank::Straight);
    assert_eq!(eval.kickers, vec![5]);
}

#[test]
fn suited_wheel_is_five_high_straight_flush() {
    let eval = evaluate_hand(&cards("5h4h3h2hAh")).unwrap();
    assert_eq!(eval.rank, HandRank::StraightFlush);
    assert_eq!(eval.kickers, vec![5]);
}

#[test]
fn straight_flush_must_live_in_one_suit() {
    // flush in hearts and a straight across suits, but no straight flush
    let eval = evaluate_hand(&cards("9h8h7h6c5h2h Kd")).unwrap();
    assert_eq!(eval.rank, HandRank::Flush);
    assert_eq!(eval.kickers, vec![9, 8, 7, 5, 2]);
}

#[test]
fn flush_kickers_are_top_five_of_suit() {
    let eval = evaluate_hand(&cards("AhKh9h7h5h3h2c")).unwrap();
    assert_eq!(eval.rank, HandRank::Flush);
    assert_eq!(eval.kickers, vec![14, 13, 9, 7, 5]);
}

#[test]
fn quads_carry_best_kicker() {
    let eval = evaluate_hand(&cards("9h9d9c9sAh2c3d")).unwrap();
    assert_eq!(eval.rank, HandRank::FourOfAKind);
    assert_eq!(eval.kickers, vec![9, 14]);
}

#[test]
fn second_trips_play_as_the_pair() {
    let eval = evaluate_hand(&cards("AhAdAcKhKdKs2c")).unwrap();
    assert_eq!(eval.rank, HandRank::FullHouse);
    assert_eq!(eval.kickers, vec![14, 13]);
}

#[test]
fn third_pair_can_be_the_two_pair_kicker() {
    let eval = evaluate_hand(&cards("AhAdKcKdQhQs2c")).unwrap();
    assert_eq!(eval.rank, HandRank::TwoPair);
    assert_eq!(eval.kickers, vec![14, 13, 12]);
}

#[test]
fn trips_and_pair_keep_side_cards() {
    let trips = evaluate_hand(&cards("7h7d7cKs2d9h4c")).unwrap();
    assert_eq!(trips.rank, HandRank::ThreeOfAKind);
    assert_eq!(trips.kickers, vec![7, 13, 9]);

    let pair = evaluate_hand(&cards("AhAdKc9s2d")).unwrap();
    assert_eq!(pair.rank, HandRank::OnePair);
    assert_eq!(pair.kickers, vec![14, 13, 9, 2]);
}

#[test]
fn kicker_breaks_equal_pairs() {
    let king = evaluate_hand(&cards("AhAdKc7s2d")).unwrap();
    let queen = evaluate_hand(&cards("AsAcQh7d2c")).unwrap();
    assert!(compare_hands(&king, &queen).is_gt());
    assert!(compare_hands(&queen, &king).is_lt());
}

#[test]
fn category_ordering_is_correct() {
    let quads = evaluate_hand(&cards("AcAdAhAsKcQd2h")).unwrap();
    let full_house = evaluate_hand(&cards("KcKdKhQcQd2h3s")).unwrap();
    let straight = evaluate_hand(&cards("5c6h7c8h9d2s3c")).unwrap();
    let trips = evaluate_hand(&cards("QcQdQhAs9c4d2h")).unwrap();
    assert!(compare_hands(&quads, &full_house).is_gt());
    assert!(compare_hands(&full_house, &straight).is_gt());
    assert!(compare_hands(&straight, &trips).is_gt());
}

#[test]
fn rejects_bad_sizes() {
    let err = evaluate_hand(&cards("AhKd")).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidHandSize);
    assert!(!err.recoverable);

    let err = evaluate_hand(&cards("2c3c4c5c6c7c8c9c")).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidHandSize);
}

#[test]
fn rejects_duplicate_cards() {
    let err = evaluate_hand(&cards("AhAhKd7s2c")).unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateCards);
}

#[test]
fn evaluator_caches_by_card_set_not_order() {
    let ev = HandEvaluator::default();
    let a = ev.evaluate(&cards("AhKdQc7s2c")).unwrap();
    let b = ev.evaluate(&cards("2c7sQcKdAh")).unwrap();
    assert_eq!(a, b);
    assert_eq!(ev.cached(), 1);
}

#[test]
fn evaluator_cache_is_bounded() {
    let ev = HandEvaluator::new(2);
    ev.evaluate(&cards("AhKdQc7s2c")).unwrap();
    ev.evaluate(&cards("AhKdQc7s3c")).unwrap();
    ev.evaluate(&cards("AhKdQc7s4c")).unwrap();
    assert_eq!(ev.cached(), 2);
    ev.clear();
    assert_eq!(ev.cached(), 0);
}

#[test]
fn cached_and_uncached_paths_agree() {
    let ev = HandEvaluator::new(16);
    for hand in ["AsKsQsJsTs", "Ah2d3c4s5h", "9h9d9c9sAh2c3d", "7h7d7cKs2d9h4c"] {
        let c = cards(hand);
        assert_eq!(ev.evaluate(&c).unwrap(), evaluate_hand(&c).unwrap());
    }
}
