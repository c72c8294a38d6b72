//! Processor tests against real files in scratch directories
//!
//! Fixtures use a compact layout (`DETAIL|<id>|<key>|<amount>`) so the
//! expected outputs stay readable.


use crate::app::services::record_parser::tests::compact_layout;
use crate::config::{OutputFormat, OutputSettings, SplitConfig, SplitMode};
use crate::processor::FileSplitter;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Header plus K1 (2 lines, 100.00), K2 (1 line, 50.00), K3 (2 lines, 75.00)
pub const SCENARIO: &str = "EXTRACT|H|0|0.0000\n\
                            DETAIL|1|K1|60.00\n\
                            DETAIL|2|K1|40.00\n\
                            DETAIL|3|K2|50.00\n\
                            DETAIL|4|K3|25.00\n\
                            DETAIL|5|K3|50.00\n";

/// Write `contents` as `name` inside the scratch directory
pub fn write_input(temp_dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Splitter for compact inputs writing to `directory`
pub fn splitter(mode: SplitMode, format: OutputFormat, directory: &Path) -> FileSplitter {
    let config = SplitConfig::new(mode).with_layout(compact_layout());
    let output = OutputSettings {
        format,
        directory: Some(directory.to_path_buf()),
        force: false,
    };
    FileSplitter::new(config, output)
}
