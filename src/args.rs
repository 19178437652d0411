use std::path::PathBuf;

use clap::Parser;

use crate::model::constants::{DEFAULT_DEVIATION, DEFAULT_RATING};

#[derive(Parser, Clone)]
#[command(
    display_name = "Skill Check Processor",
    about = "Computes an evolving skill rating from a skill-check report",
    long_about = "Reads a skill-check report, replays every attempt through the Glicko \
    rating update in chronological order, and prints the per-check rating trajectory \
    together with per-difficulty-band clear rates."
)]
pub struct Args {
    /// Path to the skill-check report file
    pub report: PathBuf,

    /// Rating the user starts from before the first check is processed
    #[arg(long, default_value_t = DEFAULT_RATING)]
    pub initial_rating: f64,

    /// Deviation the user starts from
    #[arg(long, default_value_t = DEFAULT_DEVIATION)]
    pub initial_deviation: f64,

    /// Emit the full processing result as JSON instead of the text summary
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}
