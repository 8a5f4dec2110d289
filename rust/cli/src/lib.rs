//! # ante CLI
//!
//! The reference game loop around the `ante-*` crates. Each subcommand is a thin
//! handler that writes to injected streams, so tests drive [`run`] directly.
//!
//! ## Subcommands
//!
//! - `deal`: Deal one hand from a fresh or seeded deck
//! - `eval`: Evaluate a 5 to 7 card hand
//! - `sim`: Bot-vs-bot hands with integrity validation and a JSON summary
//! - `cfg`: Show resolved configuration
//!
//! ```
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! let code = ante_cli::run(["ante", "eval", "AsKsQsJsTs"], &mut out, &mut err);
//! assert_eq!(code, 0);
//! assert!(String::from_utf8(out).unwrap().contains("Royal Flush"));
//! ```

use std::io::Write;

use clap::Parser;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod logging;

use cli::{AnteCli, Commands};
use commands::{handle_cfg_command, handle_deal_command, handle_eval_command, handle_sim_command};

pub use commands::sim::SimSummary;
pub use error::CliError;

const EXIT_OK: i32 = 0;
const EXIT_ERROR: i32 = 2;

const COMMANDS: &[&str] = &["deal", "eval", "sim", "cfg"];

/// Parse `args` and dispatch. Returns the process exit code: `0` on success, `2` on
/// any error.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match AnteCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Deal { players, seed } => handle_deal_command(players, seed, out),
        Commands::Eval { cards } => handle_eval_command(&cards.join(" "), out),
        Commands::Sim {
            hands,
            players,
            seed,
            level,
        } => handle_sim_command(hands, players, seed, level, out),
        Commands::Cfg => handle_cfg_command(out),
    };

    match result {
        Ok(()) => EXIT_OK,
        Err(e) => {
            let _ = writeln!(err, "Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // help and version go to stdout
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => EXIT_OK,
            Err(_) => EXIT_ERROR,
        };
    }
    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err, "Usage: ante <command> [options]\n\nCommands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    EXIT_ERROR
}
