//! `ante cfg`: resolved configuration with the source of each value.

use std::io::Write;

use crate::config;
use crate::error::CliError;

/// Print every setting as `{"value": .., "source": "default" | "file" | "env"}`.
///
/// The seed is shown only as its SHA-256 commitment.
pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    let seed_commitment = config.shuffle_seed()?.map(|s| s.commitment());

    let display = serde_json::json!({
        "seed": {
            "value": seed_commitment,
            "source": sources.seed,
        },
        "players": {
            "value": config.players,
            "source": sources.players,
        },
        "starting_stack": {
            "value": config.starting_stack,
            "source": sources.starting_stack,
        },
        "big_blind": {
            "value": config.big_blind,
            "source": sources.big_blind,
        },
        "max_session_loss": {
            "value": config.max_session_loss,
            "source": sources.max_session_loss,
        },
        "bot_level": {
            "value": config.bot_level,
            "source": sources.bot_level,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
