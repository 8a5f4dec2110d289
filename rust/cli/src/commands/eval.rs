//! `ante eval`: evaluate one hand and print it as JSON.

use std::io::Write;

use ante_engine::cards::parse_cards;
use ante_engine::hand::evaluate_hand;

use crate::error::CliError;

pub fn handle_eval_command(cards: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let parsed = parse_cards(cards)?;
    let eval = evaluate_hand(&parsed)?;

    let display = serde_json::json!({
        "cards": parsed.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
        "hand": eval.name(),
        "value": eval.value,
        "kickers": eval.kickers,
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
