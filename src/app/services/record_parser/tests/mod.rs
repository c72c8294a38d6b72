//! Test utilities for record parsing and the stages built on it
//!
//! Builders here produce both full-width extract lines (default layout, key
//! in field 19 and amount in field 168) and compact four-field lines for
//! tests that want readable fixtures.

use crate::config::RecordLayout;
use crate::constants::{DEFAULT_AMOUNT_FIELD_INDEX, DEFAULT_GROUPING_KEY_FIELD_INDEX};

mod parser_tests;

/// Layout for compact lines: `DETAIL|<id>|<key>|<amount>`
pub fn compact_layout() -> RecordLayout {
    RecordLayout::default()
        .with_grouping_key_field_index(2)
        .with_amount_field_index(3)
}

/// Compact detail line for [`compact_layout`]
pub fn compact_detail(id: usize, key: &str, amount: &str) -> String {
    format!("DETAIL|{}|{}|{}", id, key, amount)
}

/// Full-width detail line for the default layout
pub fn extract_detail(key: &str, amount: &str) -> String {
    let mut fields = vec![""; DEFAULT_AMOUNT_FIELD_INDEX + 1];
    fields[0] = "DETAIL";
    fields[1] = "EMP01";
    fields[DEFAULT_GROUPING_KEY_FIELD_INDEX] = key;
    fields[DEFAULT_AMOUNT_FIELD_INDEX] = amount;
    fields.join("|")
}

/// Header plus five details over keys K1 (2 lines, 100.00), K2 (1 line,
/// 50.00) and K3 (2 lines, 75.00), in the default layout
pub fn scenario_input() -> String {
    [
        "EXTRACT|H|0|0.0000".to_string(),
        extract_detail("K1", "60.00"),
        extract_detail("K1", "40.00"),
        extract_detail("K2", "50.00"),
        extract_detail("K3", "25.00"),
        extract_detail("K3", "50.00"),
    ]
    .join("\n")
}
