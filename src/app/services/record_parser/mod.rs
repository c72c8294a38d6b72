//! Record parser for pipe-delimited extract files
//!
//! Classifies each raw line as the header record, a detail record, or an
//! ignored line, and pulls the grouping key and amount out of detail records
//! by fixed field position.
//!
//! ## Architecture
//!
//! - [`parser`] - Line classification and header selection
//! - [`field_parsers`] - Positional field access and amount parsing
//!
//! Splitting is purely positional: there is no quoting or escaping, so a
//! delimiter inside a logical value always acts as a field boundary.
//!
//! ## Usage
//!
//! ```rust
//! use extract_splitter::app::services::record_parser::RecordParser;
//! use extract_splitter::config::RecordLayout;
//!
//! let layout = RecordLayout::default()
//!     .with_grouping_key_field_index(2)
//!     .with_amount_field_index(3);
//! let text = "EXTRACT|H|0|0.0000\nDETAIL|x|K1|10.00";
//!
//! let parsed = RecordParser::new(&layout).parse(text.lines(), "input.dat")?;
//! assert_eq!(parsed.details.len(), 1);
//! # Ok::<(), extract_splitter::error::SplitError>(())
//! ```

pub mod field_parsers;
pub mod parser;

#[cfg(test)]
pub mod tests;

pub use field_parsers::parse_amount;
pub use parser::{ParsedInput, RecordParser};
