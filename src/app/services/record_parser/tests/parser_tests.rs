//! Tests for line classification and header handling

use super::super::RecordParser;
use super::{compact_detail, compact_layout, scenario_input};
use crate::config::RecordLayout;
use crate::error::SplitError;
use crate::models::{FieldWarning, GroupKey};
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_parse_scenario_input() {
    let layout = RecordLayout::default();
    let text = scenario_input();

    let parsed = RecordParser::new(&layout)
        .parse(text.lines(), "extract.dat")
        .unwrap();

    assert_eq!(parsed.header.line_number, 1);
    assert_eq!(parsed.header.fields, vec!["EXTRACT", "H", "0", "0.0000"]);
    assert_eq!(parsed.details.len(), 5);
    assert_eq!(parsed.details[0].key, GroupKey::Value("K1"));
    assert_eq!(parsed.details[2].key, GroupKey::Value("K2"));
    assert_eq!(
        parsed.details[4].amount,
        Some(Decimal::from_str("50.00").unwrap())
    );
    assert_eq!(parsed.stats.total_lines, 6);
    assert_eq!(parsed.stats.detail_records, 5);
    assert!(!parsed.stats.has_warnings());
}

#[test]
fn test_missing_header_is_fatal() {
    let layout = compact_layout();
    let lines = [compact_detail(1, "K1", "1.00")];

    let result = RecordParser::new(&layout).parse(lines.iter().map(String::as_str), "no_header.dat");

    match result {
        Err(SplitError::MissingHeader { source_name }) => assert_eq!(source_name, "no_header.dat"),
        other => panic!("expected MissingHeader, got {:?}", other),
    }
}

#[test]
fn test_first_header_wins() {
    let layout = compact_layout();
    let text = "EXTRACT|FIRST|0|0\nDETAIL|1|K1|1.00\nEXTRACT|SECOND|0|0";

    let parsed = RecordParser::new(&layout).parse(text.lines(), "two_headers.dat").unwrap();

    assert_eq!(parsed.header.fields[1], "FIRST");
    assert_eq!(parsed.stats.header_lines, 2);
    assert_eq!(parsed.details.len(), 1);
}

#[test]
fn test_unknown_lines_dropped_and_counted() {
    let layout = compact_layout();
    let text = "EXTRACT|H|0|0\nTRAILER|9\n\nDETAIL|1|K1|1.00\nDETAILX|2|K1|1.00";

    let parsed = RecordParser::new(&layout).parse(text.lines(), "mixed.dat").unwrap();

    assert_eq!(parsed.details.len(), 1);
    assert_eq!(parsed.stats.ignored_lines, 3);
    assert_eq!(parsed.details[0].line_number, 4);
}

#[test]
fn test_header_too_short() {
    let layout = compact_layout();
    let text = "EXTRACT|H|0\nDETAIL|1|K1|1.00";

    let result = RecordParser::new(&layout).parse(text.lines(), "short.dat");

    assert!(matches!(
        result,
        Err(SplitError::HeaderTooShort {
            required: 4,
            found: 3
        })
    ));
}

#[test]
fn test_bom_and_carriage_returns_stripped() {
    let layout = compact_layout();
    let text = "\u{feff}EXTRACT|H|0|0\r\nDETAIL|1|K1|2.50\r\n";

    // split('\n') keeps the '\r' so the parser has to remove it
    let parsed = RecordParser::new(&layout).parse(text.split('\n'), "windows.dat").unwrap();

    assert_eq!(parsed.header.fields[0], "EXTRACT");
    assert_eq!(parsed.details[0].line, "DETAIL|1|K1|2.50");
    assert_eq!(
        parsed.details[0].amount,
        Some(Decimal::from_str("2.50").unwrap())
    );
}

#[test]
fn test_short_records_are_kept_with_warnings() {
    let layout = compact_layout();
    let text = "EXTRACT|H|0|0\nDETAIL|1\nDETAIL|2|K1\nDETAIL|3|K1|oops";

    let parsed = RecordParser::new(&layout).parse(text.lines(), "short_fields.dat").unwrap();

    assert_eq!(parsed.details.len(), 3);
    assert_eq!(parsed.details[0].key, GroupKey::Missing);
    assert_eq!(parsed.details[1].key, GroupKey::Value("K1"));
    assert!(parsed.details.iter().all(|detail| detail.amount.is_none()));

    assert_eq!(parsed.stats.missing_keys, 1);
    assert_eq!(parsed.stats.missing_amounts, 2);
    assert_eq!(parsed.stats.unparsable_amounts, 1);
    assert_eq!(
        parsed.stats.warnings[0],
        FieldWarning::MissingGroupingKey {
            line_number: 2,
            field_count: 2
        }
    );
}

#[test]
fn test_custom_record_types_and_delimiter() {
    let layout = RecordLayout {
        header_record_type: "HDR".to_string(),
        detail_record_type: "LN".to_string(),
        ..compact_layout().with_delimiter(';')
    };
    let text = "HDR;X;0;0\nLN;1;A;1\nDETAIL|1|B|2";

    let parsed = RecordParser::new(&layout).parse(text.lines(), "custom.dat").unwrap();

    assert_eq!(parsed.details.len(), 1);
    assert_eq!(parsed.details[0].key, GroupKey::Value("A"));
    assert_eq!(parsed.stats.ignored_lines, 1);
}
