//! Application constants for the extract splitter
//!
//! Default record layout, split sizes and naming conventions used throughout
//! the splitter. The layout defaults match the standard expense extract
//! (`EXTRACT` header, `DETAIL` lines, report key in column 19 and journal
//! amount in column 168).

// =============================================================================
// Record Layout
// =============================================================================

/// Field separator used by extract files
pub const DEFAULT_DELIMITER: char = '|';

/// Field 0 literal identifying the header record
pub const HEADER_RECORD_TYPE: &str = "EXTRACT";

/// Field 0 literal identifying a detail record
pub const DETAIL_RECORD_TYPE: &str = "DETAIL";

/// Position of the report key used for grouping detail records
pub const DEFAULT_GROUPING_KEY_FIELD_INDEX: usize = 19;

/// Position of the journal amount contributing to the control sum
pub const DEFAULT_AMOUNT_FIELD_INDEX: usize = 168;

/// Header position holding the detail record count
pub const DEFAULT_HEADER_COUNT_FIELD_INDEX: usize = 2;

/// Header position holding the control sum
pub const DEFAULT_HEADER_SUM_FIELD_INDEX: usize = 3;

/// Decimal places written into the rebuilt header control sum
pub const CONTROL_SUM_DECIMAL_PLACES: u32 = 4;

/// Display name of the group holding detail records too short to carry a key
pub const MISSING_KEY_LABEL: &str = "NO_KEY";

/// Byte-order mark some exporters prepend to the first line
pub const UTF8_BOM: char = '\u{feff}';

// =============================================================================
// Splitting
// =============================================================================

/// Maximum detail lines per output when no split mode is configured
pub const DEFAULT_MAX_LINES_PER_PARTITION: usize = 810;

/// Number of partitions that can be named with a single letter suffix
pub const LETTER_SUFFIX_LIMIT: usize = 26;

/// Field warnings kept verbatim in parse statistics; the rest are only counted
pub const MAX_RECORDED_WARNINGS: usize = 100;

// =============================================================================
// Input and Output
// =============================================================================

/// File extensions picked up when an input path is a directory
pub const INPUT_EXTENSIONS: &[&str] = &["dat", "txt"];

/// Suffix appended to the input stem to name the output archive
pub const ARCHIVE_SUFFIX: &str = "_split";

/// Directory name under the user config dir
pub const CONFIG_DIR_NAME: &str = "extract-splitter";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Groups listed by `inspect` when `--top` is not given
pub const DEFAULT_INSPECT_TOP: usize = 10;

/// Upper bound for concurrently processed input files
pub const MAX_PARALLEL_JOBS: usize = 64;
