//! Deterministic output names derived from the input file name

use crate::constants::{ARCHIVE_SUFFIX, LETTER_SUFFIX_LIMIT};
use std::path::Path;

/// Positional suffix of a partition
///
/// Letters `A`..`Z` while `total` fits the alphabet. Beyond that every
/// partition of the run gets a 1-based number zero-padded to the width of
/// `total`, so names still sort in partition order.
pub fn partition_suffix(index: usize, total: usize) -> String {
    debug_assert!(index < total, "partition {} out of {}", index, total);

    if total <= LETTER_SUFFIX_LIMIT && index < LETTER_SUFFIX_LIMIT {
        char::from(b'A' + index as u8).to_string()
    } else {
        let width = total.to_string().len();
        format!("{:0width$}", index + 1, width = width)
    }
}

/// Base name and extension of the input, used to name every output of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    stem: String,
    extension: Option<String>,
}

impl OutputNaming {
    pub fn new(stem: impl Into<String>, extension: Option<String>) -> Self {
        Self {
            stem: stem.into(),
            extension,
        }
    }

    /// Split a file name (or path) at its last dot
    pub fn from_file_name(file_name: &str) -> Self {
        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "output".to_string());
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());

        Self { stem, extension }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Name of partition `index` out of `total`
    pub fn partition_file_name(&self, index: usize, total: usize) -> String {
        let suffix = partition_suffix(index, total);
        match &self.extension {
            Some(ext) => format!("{}_{}.{}", self.stem, suffix, ext),
            None => format!("{}_{}", self.stem, suffix),
        }
    }

    /// Name of the zip archive collecting all partitions
    pub fn archive_name(&self) -> String {
        format!("{}{}.zip", self.stem, ARCHIVE_SUFFIX)
    }
}
