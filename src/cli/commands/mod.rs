//! Command implementations for the extract splitter CLI
//!
//! Each command lives in its own module:
//! - `split`: split files into zip archives or plain files
//! - `inspect`: header, counts and largest groups of one file

pub mod inspect;
pub mod shared;
pub mod split;

pub use shared::RunStats;

use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Dispatch to the subcommand handler
///
/// Commands stop at the next safe point once `cancellation_token` fires.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> anyhow::Result<RunStats> {
    match args.command {
        Some(Commands::Split(split_args)) => {
            split::run_split(split_args, cancellation_token).await
        }
        Some(Commands::Inspect(inspect_args)) => {
            inspect::run_inspect(inspect_args, cancellation_token).await
        }
        None => Ok(RunStats::default()),
    }
}
