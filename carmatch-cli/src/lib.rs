//! Command-line interface for the carmatch recommender.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod options;
mod rate;
mod recommend;
mod session;

pub use error::CliError;

use rate::{RateArgs, run_rate};
use recommend::{RecommendArgs, run_recommend};
use session::{SessionArgs, run_session};

pub(crate) const ARG_BUDGET: &str = "budget";
pub(crate) const ARG_FUEL: &str = "fuel";
pub(crate) const ARG_TRANSMISSION: &str = "transmission";
pub(crate) const ARG_SPACE: &str = "space";
pub(crate) const ARG_USAGE: &str = "usage";
pub(crate) const ARG_RATING: &str = "rating";
pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ARG_PREFERENCES: &str = "preferences";
pub(crate) const ARG_STORE: &str = "store";
pub(crate) const ARG_VARIANT: &str = "variant";
pub(crate) const ARG_LEARNING_RATE: &str = "learning-rate";
pub(crate) const ENV_RATE_RATING: &str = "CARMATCH_CMDS_RATE_RATING";

/// Catalog file used when no path is configured.
pub const DEFAULT_CATALOG: &str = "carDB.json";
/// JSON preference table used when no path is configured.
pub const DEFAULT_PREFERENCES: &str = "qTable.json";
/// SQLite preference database used when no path is configured.
pub const DEFAULT_PREFERENCES_DB: &str = "qTable.sqlite";

/// Run the carmatch CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] describing the first failure.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Recommend(args) => run_recommend(args),
        Command::Rate(args) => run_rate(args),
        Command::Session(args) => run_session(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "carmatch",
    about = "Recommend cars from a five-question persona and learn from ratings",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank the catalog for a persona.
    Recommend(RecommendArgs),
    /// Rate the top recommendation for a persona.
    Rate(RateArgs),
    /// Answer the questions interactively, then rate the result.
    Session(SessionArgs),
}

#[cfg(test)]
mod tests;
