//! Per-partition header regeneration.
//!
//! Each output file carries its own header whose record count and control
//! sum describe only that file. All other header fields are copied as-is.

use crate::config::RecordLayout;
use crate::constants::CONTROL_SUM_DECIMAL_PLACES;
use crate::models::HeaderRecord;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format a control sum with exactly four decimal places
///
/// Rounds half to even at the fourth place.
pub fn format_control_sum(sum: Decimal) -> String {
    let rounded = sum.round_dp_with_strategy(
        CONTROL_SUM_DECIMAL_PLACES,
        RoundingStrategy::MidpointNearestEven,
    );
    // Avoid "-0.0000" when negative amounts cancel out
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };
    format!("{:.4}", rounded)
}

/// Rebuild the header line with a partition's count and control sum
///
/// The caller guarantees the header holds both positions; the parser
/// rejects shorter headers before any partition is built.
pub fn rebuild_header(
    header: &HeaderRecord<'_>,
    layout: &RecordLayout,
    record_count: usize,
    control_sum: Decimal,
) -> String {
    let count = record_count.to_string();
    let sum = format_control_sum(control_sum);

    let fields: Vec<&str> = header
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            if index == layout.header_count_field_index {
                count.as_str()
            } else if index == layout.header_sum_field_index {
                sum.as_str()
            } else {
                *field
            }
        })
        .collect();

    fields.join(&layout.delimiter.to_string())
}
