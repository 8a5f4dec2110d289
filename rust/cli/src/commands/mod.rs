//! One module per subcommand. Handlers take their options plus an output stream and
//! return `Result<(), CliError>`; `run` maps errors to the exit code.

pub mod cfg;
pub mod deal;
pub mod eval;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use sim::handle_sim_command;
