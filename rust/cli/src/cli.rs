use ante_ai::bot::BotLevel;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ante",
    version,
    about = "Ante: card dealing, hand evaluation and bot-vs-bot simulation"
)]
pub struct AnteCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deal one hand and show every seat's best hand
    Deal {
        #[arg(long)]
        players: Option<usize>,
        /// 64 hex chars
        #[arg(long)]
        seed: Option<String>,
    },
    /// Evaluate 5 to 7 cards, e.g. `ante eval AsKsQsJsTs`
    Eval {
        #[arg(required = true, num_args = 1..)]
        cards: Vec<String>,
    },
    /// Play bot-vs-bot hands through validation, risk limits and showdown
    Sim {
        #[arg(long, default_value_t = 10)]
        hands: u64,
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, value_parser = parse_level)]
        level: Option<BotLevel>,
    },
    /// Print resolved configuration with value sources
    Cfg,
}

fn parse_level(s: &str) -> Result<BotLevel, String> {
    s.parse()
}
