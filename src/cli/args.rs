//! Command-line argument definitions for the extract splitter
//!
//! The CLI interface is defined with the clap derive API. Layout and split
//! options override the configuration file; see [`SplitArgs::load_config`].

use crate::config::{Config, OutputFormat, RecordLayout, SplitMode};
use crate::constants::{DEFAULT_INSPECT_TOP, MAX_PARALLEL_JOBS};
use crate::error::{Result, SplitError};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Split pipe-delimited expense extracts into smaller files
///
/// Detail records sharing a grouping key always stay in the same output
/// file, and every output gets a header with its own record count and
/// control sum.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "extract-splitter",
    version,
    about = "Split EXTRACT/DETAIL files into smaller files without splitting record groups",
    long_about = "Splits pipe-delimited extract files (one EXTRACT header, many DETAIL records) \
                  into several smaller files. Records sharing a grouping key (for example an \
                  expense report id) are never separated, and each output carries a rebuilt \
                  header with its own record count and control sum."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Split one or more extract files
    Split(SplitArgs),
    /// Show header, counts and group sizes of an extract without writing anything
    Inspect(InspectArgs),
}

/// Field position overrides shared by all commands
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct LayoutArgs {
    /// 0-based field index of the grouping key in detail records
    #[arg(long = "key-index", value_name = "INDEX")]
    pub key_index: Option<usize>,

    /// 0-based field index of the amount in detail records
    #[arg(long = "amount-index", value_name = "INDEX")]
    pub amount_index: Option<usize>,

    /// Field delimiter
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Trim whitespace around grouping keys before grouping
    #[arg(long = "trim-keys")]
    pub trim_keys: bool,
}

impl LayoutArgs {
    pub fn apply(&self, layout: &mut RecordLayout) {
        if let Some(index) = self.key_index {
            layout.grouping_key_field_index = index;
        }
        if let Some(index) = self.amount_index {
            layout.amount_field_index = index;
        }
        if let Some(delimiter) = self.delimiter {
            layout.delimiter = delimiter;
        }
        if self.trim_keys {
            layout.trim_grouping_key = true;
        }
    }
}

/// Split mode flags; at most one may be given
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct ModeArgs {
    /// Maximum detail lines per output file (a larger group still stays whole)
    #[arg(long = "max-lines", value_name = "LINES", conflicts_with = "files")]
    pub max_lines: Option<usize>,

    /// Exact number of output files, balanced by line count
    #[arg(long = "files", value_name = "COUNT")]
    pub files: Option<usize>,
}

impl ModeArgs {
    pub fn mode(&self) -> Option<SplitMode> {
        match (self.max_lines, self.files) {
            (_, Some(count)) => Some(SplitMode::ExactCount(count)),
            (Some(max), None) => Some(SplitMode::MaxLines(max)),
            (None, None) => None,
        }
    }
}

/// Arguments for the split command
#[derive(Debug, Clone, Parser)]
pub struct SplitArgs {
    /// Input files, directories or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory (defaults to the directory of each input)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Path to configuration file
    ///
    /// If not specified, looks for <config dir>/extract-splitter/config.toml
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Write one zip archive per input or the individual files
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Overwrite existing outputs
    #[arg(long = "force")]
    pub force: bool,

    /// Show the planned outputs without writing them
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Number of inputs processed concurrently (defaults to the CPU count)
    #[arg(short = 'j', long = "jobs", value_name = "COUNT")]
    pub jobs: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Format of the final report
    #[arg(long = "report", value_enum, default_value = "human")]
    pub report: ReportFormat,
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Extract file to inspect
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path to configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub layout: LayoutArgs,

    // Mode for the split plan, overriding one set in the config file
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Number of largest groups to list
    #[arg(long = "top", value_name = "N", default_value_t = DEFAULT_INSPECT_TOP)]
    pub top: usize,

    /// Logging verbosity level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Format of the report
    #[arg(long = "report", value_enum, default_value = "human")]
    pub report: ReportFormat,
}

/// Report formats for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

fn log_level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn check_config_file(config_file: Option<&Path>) -> Result<()> {
    if let Some(config_file) = config_file {
        if !config_file.exists() {
            return Err(SplitError::configuration(format!(
                "Config file does not exist: {}",
                config_file.display()
            )));
        }
    }
    Ok(())
}

impl SplitArgs {
    /// Validate the split arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err(SplitError::configuration(
                    "Number of jobs must be greater than 0",
                ));
            }
            if jobs > MAX_PARALLEL_JOBS {
                return Err(SplitError::configuration(format!(
                    "Number of jobs cannot exceed {}",
                    MAX_PARALLEL_JOBS
                )));
            }
        }

        if let Some(output_dir) = &self.output_dir {
            if output_dir.is_file() {
                return Err(SplitError::configuration(format!(
                    "Output path is a file, not a directory: {}",
                    output_dir.display()
                )));
            }
        }

        check_config_file(self.config_file.as_deref())
    }

    /// Configuration file (or defaults) with the command-line overrides applied
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_layered(self.config_file.as_deref())?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        self.layout.apply(&mut config.layout);

        if let Some(mode) = self.mode.mode() {
            config.split.set_mode(mode);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output.directory = Some(output_dir.clone());
        }
        if self.force {
            config.output.force = true;
        }
    }

    /// Concurrent inputs, capped at the number of CPUs by default
    pub fn jobs(&self) -> usize {
        self.jobs
            .unwrap_or_else(num_cpus::get)
            .clamp(1, MAX_PARALLEL_JOBS)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose, self.quiet)
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl InspectArgs {
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            return Err(SplitError::InputNotFound {
                path: self.input.clone(),
            });
        }
        check_config_file(self.config_file.as_deref())
    }

    /// Configuration file (or defaults) with the layout overrides applied
    ///
    /// The split mode is only overridden when `--max-lines` or `--files` is
    /// given; otherwise the configured mode is used for the plan.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_layered(self.config_file.as_deref())?;
        self.layout.apply(&mut config.layout);
        if let Some(mode) = self.mode.mode() {
            config.split.set_mode(mode);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose, false)
    }
}
