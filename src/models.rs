//! Core data structures shared by the splitting pipeline.
//!
//! Records borrow from the input text of a single run, so one immutable
//! snapshot backs every stage from parsing to serialization.

use crate::constants::{MAX_RECORDED_WARNINGS, MISSING_KEY_LABEL};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping key of a detail record
///
/// `Missing` is a distinct variant rather than a magic string so that a real
/// key spelled `NO_KEY` never merges with records that had no key at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey<'a> {
    Value(&'a str),
    Missing,
}

impl GroupKey<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, GroupKey::Missing)
    }
}

impl fmt::Display for GroupKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Value(value) => f.write_str(value),
            GroupKey::Missing => f.write_str(MISSING_KEY_LABEL),
        }
    }
}

/// The `EXTRACT` line of an input file, split into fields
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRecord<'a> {
    /// 1-based line number in the input
    pub line_number: usize,
    pub fields: Vec<&'a str>,
}

/// One `DETAIL` line with its grouping key and amount already extracted
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord<'a> {
    /// 1-based line number in the input
    pub line_number: usize,
    /// Original line, written back unchanged
    pub line: &'a str,
    pub key: GroupKey<'a>,
    /// `None` when the amount was absent or unparsable; contributes zero
    pub amount: Option<Decimal>,
}

/// Non-fatal field anomaly found while parsing a detail record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldWarning {
    /// Record too short for the grouping key; routed to the missing-key group
    MissingGroupingKey {
        line_number: usize,
        field_count: usize,
    },
    /// Record too short for the amount; contributes zero
    MissingAmount {
        line_number: usize,
        field_count: usize,
    },
    /// Amount present but not a decimal number; contributes zero
    UnparsableAmount { line_number: usize, value: String },
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldWarning::MissingGroupingKey {
                line_number,
                field_count,
            } => write!(
                f,
                "line {}: only {} fields, no grouping key (assigned to {})",
                line_number, field_count, MISSING_KEY_LABEL
            ),
            FieldWarning::MissingAmount {
                line_number,
                field_count,
            } => write!(
                f,
                "line {}: only {} fields, no amount (counted as 0)",
                line_number, field_count
            ),
            FieldWarning::UnparsableAmount { line_number, value } => write!(
                f,
                "line {}: amount '{}' is not a number (counted as 0)",
                line_number, value
            ),
        }
    }
}

/// Statistics collected by the record parser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines in the input
    pub total_lines: usize,

    /// Lines matching the header record type (only the first is used)
    pub header_lines: usize,

    /// Lines matching the detail record type
    pub detail_records: usize,

    /// Lines that were neither header nor detail
    pub ignored_lines: usize,

    pub missing_keys: usize,
    pub missing_amounts: usize,
    pub unparsable_amounts: usize,

    /// First warnings in input order, capped at `MAX_RECORDED_WARNINGS`
    pub warnings: Vec<FieldWarning>,
}

impl ParseStats {
    /// Count a field warning, keeping its details while under the cap
    pub fn record_warning(&mut self, warning: FieldWarning) {
        match &warning {
            FieldWarning::MissingGroupingKey { .. } => self.missing_keys += 1,
            FieldWarning::MissingAmount { .. } => self.missing_amounts += 1,
            FieldWarning::UnparsableAmount { .. } => self.unparsable_amounts += 1,
        }

        if self.warnings.len() < MAX_RECORDED_WARNINGS {
            self.warnings.push(warning);
        }
    }

    /// Total number of field warnings, including those beyond the cap
    pub fn warning_count(&self) -> usize {
        self.missing_keys + self.missing_amounts + self.unparsable_amounts
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }
}

/// Whole groups assigned to one output file, by position in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub groups: Vec<usize>,
    pub line_count: usize,
}

impl Partition {
    pub fn push(&mut self, group: usize, size: usize) {
        self.groups.push(group);
        self.line_count += size;
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One serialized output: rebuilt header followed by its detail lines
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    pub name: String,
    pub contents: String,
    pub record_count: usize,
    pub group_count: usize,
    pub control_sum: Decimal,
}

/// Everything produced by one run of the pipeline
#[derive(Debug, Clone)]
pub struct SplitOutput {
    pub files: Vec<OutputFile>,
    pub stats: ParseStats,
    pub group_count: usize,
    /// Name of the partitioning strategy that produced `files`
    pub strategy: &'static str,
}

impl SplitOutput {
    /// Detail records across all outputs
    pub fn total_records(&self) -> usize {
        self.files.iter().map(|file| file.record_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_displays_sentinel() {
        assert_eq!(GroupKey::Missing.to_string(), "NO_KEY");
        assert_eq!(GroupKey::Value("R-100").to_string(), "R-100");
        assert_ne!(GroupKey::Missing, GroupKey::Value("NO_KEY"));
    }

    #[test]
    fn test_parse_stats_caps_recorded_warnings() {
        let mut stats = ParseStats::default();
        for line_number in 1..=(MAX_RECORDED_WARNINGS + 5) {
            stats.record_warning(FieldWarning::MissingAmount {
                line_number,
                field_count: 3,
            });
        }

        assert_eq!(stats.missing_amounts, MAX_RECORDED_WARNINGS + 5);
        assert_eq!(stats.warning_count(), MAX_RECORDED_WARNINGS + 5);
        assert_eq!(stats.warnings.len(), MAX_RECORDED_WARNINGS);
        assert!(stats.has_warnings());
    }

    #[test]
    fn test_partition_push_tracks_lines() {
        let mut partition = Partition::default();
        assert!(partition.is_empty());

        partition.push(0, 3);
        partition.push(4, 2);

        assert_eq!(partition.groups, vec![0, 4]);
        assert_eq!(partition.line_count, 5);
    }
}
