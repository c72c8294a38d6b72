//! Error handling for extract splitting operations.
//!
//! Structural problems (no header, impossible partition count) are fatal and
//! surface as distinct variants so the CLI can print a specific message.
//! Field-level anomalies never reach this type; they are recorded as
//! [`FieldWarning`](crate::models::FieldWarning)s in the parse statistics.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Invalid configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No header record found in {source_name}")]
    MissingHeader { source_name: String },

    #[error(
        "Header record has {found} fields but the count/sum positions need at least {required}"
    )]
    HeaderTooShort { required: usize, found: usize },

    #[error(
        "Cannot create {requested} partitions from {groups} distinct groups; a group is never split"
    )]
    TooManyPartitions { requested: usize, groups: usize },

    #[error("Control sum overflowed while totalling partition {partition}")]
    ControlSumOverflow { partition: usize },

    #[error("Input not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Output already exists: {path} (use --force to overwrite)")]
    OutputExists { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Background task failed: {reason}")]
    TaskFailed { reason: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl SplitError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Errors that should stop a multi-file run instead of moving on to the next input
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            SplitError::Configuration { .. }
                | SplitError::ConfigParse { .. }
                | SplitError::Interrupted { .. }
        )
    }
}

impl From<tokio::task::JoinError> for SplitError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::TaskFailed {
            reason: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;
