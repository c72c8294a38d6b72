//! File-level processing around the in-memory pipeline.
//!
//! Reads one input file, runs the split on a blocking worker and hands the
//! outputs to the writer. Modules:
//!
//! - [`discovery`] - expanding CLI inputs into the list of files to split
//! - [`writer`] - atomic zip and plain-file output

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::writer::OutputWriter;

use crate::app::services::header_rebuilder::format_control_sum;
use crate::app::services::output_assembler::OutputNaming;
use crate::app::services::pipeline::split_text;
use crate::config::{OutputSettings, SplitConfig};
use crate::error::{Result, SplitError};
use crate::models::{OutputFile, ParseStats};

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Summary of one output file, without its contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSummary {
    pub name: String,
    pub record_count: usize,
    pub group_count: usize,
    /// Formatted the way it appears in the rebuilt header
    pub control_sum: String,
}

impl From<&OutputFile> for OutputSummary {
    fn from(file: &OutputFile) -> Self {
        Self {
            name: file.name.clone(),
            record_count: file.record_count,
            group_count: file.group_count,
            control_sum: format_control_sum(file.control_sum),
        }
    }
}

/// Result of splitting one input file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    /// Paths written to disk; empty for a dry run
    pub written: Vec<PathBuf>,
    pub outputs: Vec<OutputSummary>,
    pub group_count: usize,
    pub strategy: &'static str,
    pub stats: ParseStats,
    pub processing_time_ms: u128,
    pub dry_run: bool,
}

impl FileReport {
    pub fn total_records(&self) -> usize {
        self.outputs.iter().map(|output| output.record_count).sum()
    }
}

/// Splits input files on disk
#[derive(Debug, Clone)]
pub struct FileSplitter {
    config: SplitConfig,
    output: OutputSettings,
    dry_run: bool,
    cancellation_token: CancellationToken,
}

impl FileSplitter {
    pub fn new(config: SplitConfig, output: OutputSettings) -> Self {
        Self {
            config,
            output,
            dry_run: false,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Plan the split without writing anything
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop starting new work once `token` is cancelled
    ///
    /// A write that has already started always runs to completion, so a
    /// cancelled run never leaves temporary files behind.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Configured output directory, or the directory holding `input`
    pub fn output_dir_for(&self, input: &Path) -> PathBuf {
        if let Some(directory) = &self.output.directory {
            return directory.clone();
        }

        match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Split one input file
    ///
    /// Either every output is written or none is.
    pub async fn process(&self, input: &Path) -> Result<FileReport> {
        let start_time = Instant::now();
        self.check_cancelled(input)?;

        if !input.is_file() {
            return Err(SplitError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let text = fs::read_to_string(input).await?;
        let source_name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!("Read {} bytes from {}", text.len(), input.display());

        let config = self.config.clone();
        let name = source_name.clone();
        let output = task::spawn_blocking(move || split_text(&text, &name, &config)).await??;

        let outputs: Vec<OutputSummary> = output.files.iter().map(OutputSummary::from).collect();

        let written = if self.dry_run {
            debug!("Dry run, skipping write for {}", input.display());
            Vec::new()
        } else {
            self.check_cancelled(input)?;
            let writer = OutputWriter::new(
                self.output.format,
                self.output_dir_for(input),
                self.output.force,
            );
            let naming = OutputNaming::from_file_name(&source_name);
            let files = output.files;
            task::spawn_blocking(move || writer.write(&naming, &files)).await??
        };

        let processing_time_ms = start_time.elapsed().as_millis();
        info!(
            "Split {} into {} outputs in {}ms",
            input.display(),
            outputs.len(),
            processing_time_ms
        );

        Ok(FileReport {
            input: input.to_path_buf(),
            written,
            outputs,
            group_count: output.group_count,
            strategy: output.strategy,
            stats: output.stats,
            processing_time_ms,
            dry_run: self.dry_run,
        })
    }

    fn check_cancelled(&self, input: &Path) -> Result<()> {
        if self.cancellation_token.is_cancelled() {
            debug!("Cancelled before finishing {}", input.display());
            return Err(SplitError::Interrupted {
                reason: "Processing interrupted by user".to_string(),
            });
        }
        Ok(())
    }
}
