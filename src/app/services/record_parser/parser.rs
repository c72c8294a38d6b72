//! Line classification and header selection

use super::field_parsers::{extract_amount, extract_group_key};
use crate::config::RecordLayout;
use crate::constants::UTF8_BOM;
use crate::error::{Result, SplitError};
use crate::models::{DetailRecord, HeaderRecord, ParseStats};
use tracing::{debug, warn};

/// Header, detail records and statistics parsed from one input
#[derive(Debug, Clone)]
pub struct ParsedInput<'a> {
    pub header: HeaderRecord<'a>,
    /// Detail records in input order
    pub details: Vec<DetailRecord<'a>>,
    pub stats: ParseStats,
}

/// Parser bound to one record layout
#[derive(Debug, Clone, Copy)]
pub struct RecordParser<'c> {
    layout: &'c RecordLayout,
}

enum LineKind {
    Header,
    Detail,
    Other,
}

impl<'c> RecordParser<'c> {
    pub fn new(layout: &'c RecordLayout) -> Self {
        Self { layout }
    }

    /// Parse raw lines into a header and ordered detail records
    ///
    /// The first header line wins; later ones are counted and ignored.
    /// Fails with [`SplitError::MissingHeader`] when no line is a header and
    /// with [`SplitError::HeaderTooShort`] when the header cannot hold the
    /// count and sum positions.
    pub fn parse<'a, I>(&self, lines: I, source_name: &str) -> Result<ParsedInput<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut stats = ParseStats::default();
        let mut header: Option<HeaderRecord<'a>> = None;
        let mut details = Vec::new();

        for (index, raw_line) in lines.into_iter().enumerate() {
            let line_number = index + 1;
            stats.total_lines += 1;

            let mut line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if index == 0 {
                line = line.strip_prefix(UTF8_BOM).unwrap_or(line);
            }

            match self.classify(line) {
                LineKind::Header => {
                    stats.header_lines += 1;
                    if header.is_none() {
                        header = Some(HeaderRecord {
                            line_number,
                            fields: line.split(self.layout.delimiter).collect(),
                        });
                    } else {
                        debug!("Ignoring additional header record on line {}", line_number);
                    }
                }
                LineKind::Detail => {
                    stats.detail_records += 1;
                    details.push(self.parse_detail(line, line_number, &mut stats));
                }
                LineKind::Other => stats.ignored_lines += 1,
            }
        }

        let header = header.ok_or_else(|| SplitError::MissingHeader {
            source_name: source_name.to_string(),
        })?;

        let required = self.layout.required_header_fields();
        if header.fields.len() < required {
            return Err(SplitError::HeaderTooShort {
                required,
                found: header.fields.len(),
            });
        }

        if stats.header_lines > 1 {
            warn!(
                "{}: {} header records found, using the one on line {}",
                source_name, stats.header_lines, header.line_number
            );
        }

        if stats.has_warnings() {
            warn!(
                "{}: {} field warnings ({} missing keys, {} missing amounts, {} unparsable amounts)",
                source_name,
                stats.warning_count(),
                stats.missing_keys,
                stats.missing_amounts,
                stats.unparsable_amounts
            );
        }

        debug!(
            "Parsed {}: {} lines, {} detail records, {} ignored",
            source_name, stats.total_lines, stats.detail_records, stats.ignored_lines
        );

        Ok(ParsedInput {
            header,
            details,
            stats,
        })
    }

    fn classify(&self, line: &str) -> LineKind {
        let record_type = line.split(self.layout.delimiter).next().unwrap_or_default();

        if record_type == self.layout.header_record_type {
            LineKind::Header
        } else if record_type == self.layout.detail_record_type {
            LineKind::Detail
        } else {
            LineKind::Other
        }
    }

    fn parse_detail<'a>(
        &self,
        line: &'a str,
        line_number: usize,
        stats: &mut ParseStats,
    ) -> DetailRecord<'a> {
        let fields: Vec<&'a str> = line.split(self.layout.delimiter).collect();

        let (key, key_warning) = extract_group_key(&fields, self.layout, line_number);
        let (amount, amount_warning) = extract_amount(&fields, self.layout, line_number);

        for warning in [key_warning, amount_warning].into_iter().flatten() {
            debug!("Field warning: {}", warning);
            stats.record_warning(warning);
        }

        DetailRecord {
            line_number,
            line,
            key,
            amount,
        }
    }
}
