//! Field parsing utilities for detail records
//!
//! Every lookup here is soft: a missing or malformed field produces a
//! fallback value plus a [`FieldWarning`], never an error.

use crate::config::RecordLayout;
use crate::models::{FieldWarning, GroupKey};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount field as an exact decimal
///
/// Accepts plain (`-12.50`, `+3`) and scientific (`1.5e2`) notation with
/// surrounding whitespace. Empty values and non-finite spellings such as
/// `NaN` are rejected.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    Decimal::from_str(trimmed)
        .ok()
        .or_else(|| Decimal::from_scientific(trimmed).ok())
}

/// Read the grouping key, falling back to the missing-key group
pub fn extract_group_key<'a>(
    fields: &[&'a str],
    layout: &RecordLayout,
    line_number: usize,
) -> (GroupKey<'a>, Option<FieldWarning>) {
    match fields.get(layout.grouping_key_field_index) {
        Some(value) => {
            let value = if layout.trim_grouping_key {
                value.trim()
            } else {
                value
            };
            (GroupKey::Value(value), None)
        }
        None => (
            GroupKey::Missing,
            Some(FieldWarning::MissingGroupingKey {
                line_number,
                field_count: fields.len(),
            }),
        ),
    }
}

/// Read the amount, falling back to a non-contributing `None`
pub fn extract_amount(
    fields: &[&str],
    layout: &RecordLayout,
    line_number: usize,
) -> (Option<Decimal>, Option<FieldWarning>) {
    let Some(raw) = fields.get(layout.amount_field_index) else {
        return (
            None,
            Some(FieldWarning::MissingAmount {
                line_number,
                field_count: fields.len(),
            }),
        );
    };

    match parse_amount(raw) {
        Some(amount) => (Some(amount), None),
        None => (
            None,
            Some(FieldWarning::UnparsableAmount {
                line_number,
                value: raw.to_string(),
            }),
        ),
    }
}
