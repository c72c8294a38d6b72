//! Shared components for CLI commands
//!
//! Logging setup, progress reporting and the run statistics returned to
//! `main` for the exit code.

use crate::error::SplitError;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Statistics for one command run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Inputs split (or planned, for a dry run)
    pub files_processed: usize,
    /// Inputs that failed, with the error message
    pub failures: Vec<(PathBuf, String)>,
    /// Output files produced across all inputs
    pub outputs_produced: usize,
    /// Detail records across all outputs
    pub records_written: usize,
    /// Field warnings across all inputs
    pub warnings: usize,
    pub processing_time: Duration,
}

impl RunStats {
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn record_failure(&mut self, input: PathBuf, error: &SplitError) {
        self.failures.push((input, error.to_string()));
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the level derived from `-v`/`-q`.
pub fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("extract_splitter={}", log_level)));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Progress bar over a number of input files
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} ETA: {eta}",
        )
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
