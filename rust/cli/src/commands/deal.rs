//! `ante deal`: deal one hand to every seat, run out the board and show the winner.

use std::io::Write;

use ante_engine::cards::Card;
use ante_engine::deck::create_deck_from_seed;
use ante_engine::game::{Stage, deal_cards, deal_community_cards};
use ante_engine::hand::{determine_winner, evaluate_hand};
use ante_engine::player::Player;
use ante_engine::rng::generate_secure_seed;

use crate::config::{self, validate_players};
use crate::error::CliError;

fn join(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deal from `seed` (or the configured seed, or a fresh secure one). Output is fully
/// determined by the seed; only its commitment is printed.
pub fn handle_deal_command(
    players: Option<usize>,
    seed: Option<String>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut cfg = config::load()?;
    if seed.is_some() {
        cfg.seed = seed;
    }
    let players = players.unwrap_or(cfg.players);
    validate_players(players)?;
    let seed = match cfg.shuffle_seed()? {
        Some(s) => s,
        None => generate_secure_seed()?,
    };

    let mut deck = create_deck_from_seed(&seed)?;
    let holes = deal_cards(&mut deck, players)?;
    let mut board = Vec::with_capacity(5);
    for stage in [Stage::Flop, Stage::Turn, Stage::River] {
        board.extend(deal_community_cards(&mut deck, stage)?);
    }

    writeln!(out, "Shuffle commitment: {}", seed.commitment())?;
    let seats: Vec<Player> = holes
        .into_iter()
        .enumerate()
        .map(|(i, hole)| Player::with_hole(format!("Seat {}", i + 1), 0, hole))
        .collect();
    for seat in &seats {
        let mut cards = seat.hole_cards();
        cards.extend_from_slice(&board);
        let eval = evaluate_hand(&cards)?;
        writeln!(out, "{}: {}  {}", seat.id, join(&seat.hole_cards()), eval.name())?;
    }
    writeln!(out, "Board: {}", join(&board))?;

    let winners = determine_winner(&seats, &board)?;
    let names: Vec<&str> = winners.iter().map(|p| p.id.as_str()).collect();
    writeln!(out, "Winner: {}", names.join(", "))?;
    Ok(())
}
