//! Command-line interface for the Pokedex catalogue.
//!
//! `ingest` builds the dataset from the remote API; `search` and `suggest`
//! query an existing dataset and print JSON to stdout.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod ingest;
mod query;

pub use error::CliError;

use ingest::{IngestArgs, run_ingest};
use query::{SearchArgs, SuggestArgs, run_search, run_suggest};

const ARG_LIMIT: &str = "limit";
const ARG_CONCURRENCY: &str = "concurrency";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ENV_LIMIT: &str = "POKEDEX_CMDS_INGEST_LIMIT";
const ENV_CONCURRENCY: &str = "POKEDEX_CMDS_INGEST_CONCURRENCY";
const ENV_TIMEOUT_SECS: &str = "POKEDEX_CMDS_INGEST_TIMEOUT_SECS";

/// Run the Pokedex CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns the first failure raised while parsing arguments, resolving
/// configuration or running the selected command.
pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Help and version requests are not failures.
        Err(err) if !err.use_stderr() => {
            err.print().map_err(CliError::WriteOutput)?;
            return Ok(());
        }
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    match cli.command {
        Command::Ingest(args) => {
            run_ingest(args)?;
        }
        Command::Search(args) => {
            let mut stdout = std::io::stdout().lock();
            run_search(&args, &mut stdout)?;
        }
        Command::Suggest(args) => {
            let mut stdout = std::io::stdout().lock();
            run_suggest(&args, &mut stdout)?;
        }
    }
    Ok(())
}

/// Install the process logger.
///
/// Defaults to `info`; `RUST_LOG` overrides the filter.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}

#[derive(Debug, Parser)]
#[command(
    name = "pokedex",
    about = "Build and query the offline creature catalogue",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the catalogue API and write the dataset file.
    Ingest(IngestArgs),
    /// Filter and sort the records in a dataset.
    Search(SearchArgs),
    /// Autocomplete names from a dataset.
    Suggest(SuggestArgs),
}

#[cfg(test)]
mod tests;
