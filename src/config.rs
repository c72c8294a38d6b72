//! Configuration management and validation.
//!
//! Provides the record layout (field positions and record type literals),
//! the split mode, and output settings. Values are layered: built-in
//! defaults, then an optional TOML file, then command-line overrides.
//!
//! ```toml
//! [layout]
//! delimiter = "|"
//! grouping_key_field_index = 19
//! amount_field_index = 168
//!
//! [split]
//! exact_partition_count = 4
//!
//! [output]
//! format = "zip"
//! ```

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_AMOUNT_FIELD_INDEX, DEFAULT_DELIMITER,
    DEFAULT_GROUPING_KEY_FIELD_INDEX, DEFAULT_HEADER_COUNT_FIELD_INDEX,
    DEFAULT_HEADER_SUM_FIELD_INDEX, DEFAULT_MAX_LINES_PER_PARTITION, DETAIL_RECORD_TYPE,
    HEADER_RECORD_TYPE,
};
use crate::error::{Result, SplitError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed positions and literals describing the extract record shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordLayout {
    /// Field separator
    pub delimiter: char,

    /// Field 0 value of the header record
    pub header_record_type: String,

    /// Field 0 value of detail records
    pub detail_record_type: String,

    /// Position of the grouping key within a detail record
    pub grouping_key_field_index: usize,

    /// Position of the amount within a detail record
    pub amount_field_index: usize,

    /// Header position rewritten with the partition record count
    pub header_count_field_index: usize,

    /// Header position rewritten with the partition control sum
    pub header_sum_field_index: usize,

    /// Trim surrounding whitespace from grouping keys before grouping
    pub trim_grouping_key: bool,
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            header_record_type: HEADER_RECORD_TYPE.to_string(),
            detail_record_type: DETAIL_RECORD_TYPE.to_string(),
            grouping_key_field_index: DEFAULT_GROUPING_KEY_FIELD_INDEX,
            amount_field_index: DEFAULT_AMOUNT_FIELD_INDEX,
            header_count_field_index: DEFAULT_HEADER_COUNT_FIELD_INDEX,
            header_sum_field_index: DEFAULT_HEADER_SUM_FIELD_INDEX,
            trim_grouping_key: false,
        }
    }
}

impl RecordLayout {
    /// Set the grouping key position
    pub fn with_grouping_key_field_index(mut self, index: usize) -> Self {
        self.grouping_key_field_index = index;
        self
    }

    /// Set the amount position
    pub fn with_amount_field_index(mut self, index: usize) -> Self {
        self.amount_field_index = index;
        self
    }

    /// Set the field separator
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the header positions for record count and control sum
    pub fn with_header_fields(mut self, count_index: usize, sum_index: usize) -> Self {
        self.header_count_field_index = count_index;
        self.header_sum_field_index = sum_index;
        self
    }

    /// Enable whitespace trimming of grouping keys
    pub fn with_trimmed_keys(mut self) -> Self {
        self.trim_grouping_key = true;
        self
    }

    /// Minimum number of fields a header needs for both rewritten positions
    pub fn required_header_fields(&self) -> usize {
        self.header_count_field_index
            .max(self.header_sum_field_index)
            + 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(SplitError::configuration(
                "Delimiter cannot be a line break",
            ));
        }

        if self.header_record_type.is_empty() || self.detail_record_type.is_empty() {
            return Err(SplitError::configuration(
                "Header and detail record types cannot be empty",
            ));
        }

        if self.header_record_type == self.detail_record_type {
            return Err(SplitError::configuration(format!(
                "Header and detail record types must differ (both are '{}')",
                self.header_record_type
            )));
        }

        if self.header_count_field_index == 0 || self.header_sum_field_index == 0 {
            return Err(SplitError::configuration(
                "Header count and sum positions cannot overwrite the record type in field 0",
            ));
        }

        if self.header_count_field_index == self.header_sum_field_index {
            return Err(SplitError::configuration(format!(
                "Header count and sum positions must differ (both are {})",
                self.header_count_field_index
            )));
        }

        Ok(())
    }
}

/// How groups are distributed over output files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Greedy batching in first-seen order, at most this many detail lines per file
    /// unless a single group is larger
    MaxLines(usize),

    /// Exactly this many files, balanced by detail line count
    ExactCount(usize),
}

impl SplitMode {
    pub fn validate(&self) -> Result<()> {
        match self {
            SplitMode::MaxLines(0) => Err(SplitError::configuration(
                "Max lines per partition must be greater than 0",
            )),
            SplitMode::ExactCount(0) => Err(SplitError::configuration(
                "Number of partitions must be greater than 0",
            )),
            _ => Ok(()),
        }
    }
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::MaxLines(DEFAULT_MAX_LINES_PER_PARTITION)
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMode::MaxLines(max) => write!(f, "max {} lines per file", max),
            SplitMode::ExactCount(count) => write!(f, "exactly {} files", count),
        }
    }
}

/// `[split]` section as written in a configuration file
///
/// Both options are accepted by the parser so that setting both can be
/// reported as an error instead of silently preferring one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    pub max_lines_per_partition: Option<usize>,
    pub exact_partition_count: Option<usize>,
}

impl SplitSettings {
    pub fn mode(&self) -> Result<SplitMode> {
        let mode = match (self.max_lines_per_partition, self.exact_partition_count) {
            (Some(_), Some(_)) => {
                return Err(SplitError::configuration(
                    "max_lines_per_partition and exact_partition_count are mutually exclusive",
                ));
            }
            (Some(max), None) => SplitMode::MaxLines(max),
            (None, Some(count)) => SplitMode::ExactCount(count),
            (None, None) => SplitMode::default(),
        };

        mode.validate()?;
        Ok(mode)
    }

    /// Mode set explicitly, `None` when the defaults apply
    pub fn configured_mode(&self) -> Result<Option<SplitMode>> {
        if self.max_lines_per_partition.is_none() && self.exact_partition_count.is_none() {
            return Ok(None);
        }
        self.mode().map(Some)
    }

    /// Replace whichever mode was configured
    pub fn set_mode(&mut self, mode: SplitMode) {
        match mode {
            SplitMode::MaxLines(max) => {
                self.max_lines_per_partition = Some(max);
                self.exact_partition_count = None;
            }
            SplitMode::ExactCount(count) => {
                self.max_lines_per_partition = None;
                self.exact_partition_count = Some(count);
            }
        }
    }
}

/// Container used to deliver the outputs of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One zip archive per input
    #[default]
    Zip,
    /// Individual files written next to each other
    Files,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,

    /// Destination directory; defaults to the directory of each input
    pub directory: Option<PathBuf>,

    /// Overwrite existing outputs
    pub force: bool,
}

/// Complete configuration as loaded from defaults, file and CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: RecordLayout,
    pub split: SplitSettings,
    pub output: OutputSettings,
}

impl Config {
    /// `<config dir>/extract-splitter/config.toml`, if the platform has a config dir
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents).map_err(|source| SplitError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Defaults, overlaid by `config_file` or the default config path when it exists
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(SplitError::configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => match Self::default_config_path().filter(|path| path.exists()) {
                Some(path) => {
                    debug!("Loading configuration from {}", path.display());
                    Self::from_file(&path)
                }
                None => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.split.mode()?;
        Ok(())
    }

    /// The call-scoped configuration handed to the pipeline
    pub fn split_config(&self) -> Result<SplitConfig> {
        let config = SplitConfig {
            layout: self.layout.clone(),
            mode: self.split.mode()?,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitConfig {
    pub layout: RecordLayout,
    pub mode: SplitMode,
}

impl SplitConfig {
    /// Default layout with the given split mode
    pub fn new(mode: SplitMode) -> Self {
        Self {
            layout: RecordLayout::default(),
            mode,
        }
    }

    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.mode.validate()
    }
}
