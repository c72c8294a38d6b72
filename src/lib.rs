//! Extract Splitter Library
//!
//! Splits pipe-delimited expense extracts into smaller files. An extract is
//! one `EXTRACT` header line followed by `DETAIL` lines; detail lines sharing
//! a grouping key (an expense report id, say) are never separated, and each
//! output carries a rebuilt header with its own record count and control sum.
//!
//! This library provides tools for:
//! - Parsing header and detail records at configured field positions
//! - Grouping detail records by key in first-seen order
//! - Partitioning groups by maximum line count or into an exact number of files
//! - Writing outputs atomically as a zip archive or plain files
//!
//! ```
//! use extract_splitter::{SplitConfig, SplitMode, split_text};
//! use extract_splitter::config::RecordLayout;
//!
//! let layout = RecordLayout::default()
//!     .with_grouping_key_field_index(2)
//!     .with_amount_field_index(3);
//! let config = SplitConfig::new(SplitMode::ExactCount(2)).with_layout(layout);
//!
//! let input = "EXTRACT|H|0|0\nDETAIL|1|R1|10.00\nDETAIL|2|R2|5.00\nDETAIL|3|R1|2.50";
//! let output = split_text(input, "extract.dat", &config).unwrap();
//!
//! assert_eq!(output.files.len(), 2);
//! assert_eq!(output.files[0].name, "extract_A.dat");
//! assert!(output.files[0].contents.starts_with("EXTRACT|H|2|12.5000"));
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Core application modules
pub mod app {
    pub mod services;
}

pub mod processor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::services::pipeline::{split_lines, split_text};
pub use config::{Config, SplitConfig, SplitMode};
pub use error::{Result, SplitError};
pub use models::{OutputFile, SplitOutput};
pub use processor::{FileReport, FileSplitter};
