//! Input discovery for extract files
//!
//! Expands the inputs given on the command line into the files to split.
//! Each input may be a file, a directory (walked recursively for extract
//! extensions) or a glob pattern. Directories and patterns skip the outputs
//! of an earlier split that sit next to their source extract.

use crate::constants::INPUT_EXTENSIONS;
use crate::error::{Result, SplitError};
use indexmap::IndexSet;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Expands CLI inputs into a de-duplicated list of files
#[derive(Debug, Clone)]
pub struct InputDiscovery {
    extensions: Vec<String>,
}

impl Default for InputDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDiscovery {
    pub fn new() -> Self {
        Self {
            extensions: INPUT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// Extensions matched when walking directories (case-insensitive)
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|ext| ext.to_lowercase()).collect();
        self
    }

    /// Discover files for all inputs
    ///
    /// Inputs keep their command-line order; the files a directory or pattern
    /// expands to are sorted by path. A file reached twice is listed once.
    pub fn discover(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = IndexSet::new();

        for input in inputs {
            let found = self.expand(input)?;
            debug!("{} -> {} files", input.display(), found.len());
            files.extend(found);
        }

        Ok(files.into_iter().collect())
    }

    fn expand(&self, input: &Path) -> Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }

        if input.is_dir() {
            return Ok(skip_split_outputs(self.walk_directory(input)?));
        }

        let pattern = input.to_string_lossy();
        if is_glob_pattern(&pattern) {
            let matches = expand_pattern(&pattern)?;
            if !matches.is_empty() {
                return Ok(skip_split_outputs(matches));
            }
        }

        Err(SplitError::InputNotFound {
            path: input.to_path_buf(),
        })
    }

    fn walk_directory(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(directory).sort_by_file_name() {
            let entry = entry.map_err(|error| SplitError::Io(error.into()))?;
            if entry.file_type().is_file() && self.has_input_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn has_input_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

/// Drop `{stem}_{suffix}.{ext}` files whose `{stem}.{ext}` source is also listed
fn skip_split_outputs(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let candidates: HashSet<PathBuf> = files.iter().cloned().collect();

    files
        .into_iter()
        .filter(|path| match split_source(path) {
            Some(source) if candidates.contains(&source) => {
                debug!(
                    "Skipping {}, an output of {}",
                    path.display(),
                    source.display()
                );
                false
            }
            _ => true,
        })
        .collect()
}

/// Source file `path` would have been split from, if its name has a partition suffix
fn split_source(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let (base, suffix) = stem.rsplit_once('_')?;
    if base.is_empty() || !is_partition_suffix(suffix) {
        return None;
    }

    let source_name = match path.extension() {
        Some(ext) => format!("{}.{}", base, ext.to_string_lossy()),
        None => base.to_string(),
    };
    Some(path.with_file_name(source_name))
}

/// A single letter `A`..`Z` or a zero-padded number
fn is_partition_suffix(suffix: &str) -> bool {
    let letter = suffix.len() == 1 && suffix.bytes().all(|b| b.is_ascii_uppercase());
    let number = !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit());
    letter || number
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|error| {
        SplitError::configuration(format!("Invalid input pattern '{}': {}", pattern, error))
    })?;

    let mut files = Vec::new();
    for path in paths {
        let path = path.map_err(|error| SplitError::Io(error.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Two extracts at the top level, one nested, plus files to skip
    fn create_input_tree(temp_dir: &TempDir) -> PathBuf {
        let root = temp_dir.path().join("inbox");
        let nested = root.join("2024").join("01");
        fs::create_dir_all(&nested).unwrap();

        fs::write(root.join("b_extract.dat"), "EXTRACT|H|0|0").unwrap();
        fs::write(root.join("a_extract.TXT"), "EXTRACT|H|0|0").unwrap();
        fs::write(root.join("notes.md"), "skip").unwrap();
        fs::write(root.join("a_extract_split.zip"), "skip").unwrap();
        fs::write(nested.join("c_extract.dat"), "EXTRACT|H|0|0").unwrap();

        root
    }

    #[test]
    fn test_directory_walk_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_input_tree(&temp_dir);

        let files = InputDiscovery::new().discover(&[root.clone()]).unwrap();

        assert_eq!(
            files,
            vec![
                root.join("2024").join("01").join("c_extract.dat"),
                root.join("a_extract.TXT"),
                root.join("b_extract.dat"),
            ]
        );
    }

    #[test]
    fn test_explicit_file_kept_regardless_of_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_input_tree(&temp_dir);

        let files = InputDiscovery::new()
            .discover(&[root.join("notes.md")])
            .unwrap();

        assert_eq!(files, vec![root.join("notes.md")]);
    }

    #[test]
    fn test_glob_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_input_tree(&temp_dir);

        let files = InputDiscovery::new()
            .discover(&[root.join("*_extract.*")])
            .unwrap();

        assert_eq!(
            files,
            vec![root.join("a_extract.TXT"), root.join("b_extract.dat")]
        );
    }

    #[test]
    fn test_duplicates_listed_once_in_first_seen_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_input_tree(&temp_dir);
        let single = root.join("b_extract.dat");

        let files = InputDiscovery::new()
            .discover(&[single.clone(), root.clone(), single.clone()])
            .unwrap();

        assert_eq!(files.len(), 3);
        assert_eq!(files[0], single);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let temp_dir = TempDir::new().unwrap();

        let result = InputDiscovery::new().discover(&[temp_dir.path().join("absent.dat")]);
        assert!(matches!(result, Err(SplitError::InputNotFound { .. })));

        let result = InputDiscovery::new().discover(&[temp_dir.path().join("*.dat")]);
        assert!(matches!(result, Err(SplitError::InputNotFound { .. })));
    }

    #[test]
    fn test_custom_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_input_tree(&temp_dir);

        let files = InputDiscovery::new()
            .with_extensions(&["MD"])
            .discover(&[root.clone()])
            .unwrap();

        assert_eq!(files, vec![root.join("notes.md")]);
    }

    #[test]
    fn test_previous_split_outputs_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("extract.dat"), "EXTRACT|H|0|0").unwrap();
        fs::write(root.join("extract_A.dat"), "EXTRACT|H|0|0").unwrap();
        fs::write(root.join("extract_B.dat"), "EXTRACT|H|0|0").unwrap();
        fs::write(root.join("bulk_07.txt"), "EXTRACT|H|0|0").unwrap();
        fs::write(root.join("bulk.txt"), "EXTRACT|H|0|0").unwrap();
        // No source next to it, so this one is an input of its own
        fs::write(root.join("payroll_C.dat"), "EXTRACT|H|0|0").unwrap();
        fs::write(root.join("extract_old.dat"), "EXTRACT|H|0|0").unwrap();

        let files = InputDiscovery::new()
            .discover(&[root.to_path_buf()])
            .unwrap();
        assert_eq!(
            files,
            vec![
                root.join("bulk.txt"),
                root.join("extract.dat"),
                root.join("extract_old.dat"),
                root.join("payroll_C.dat"),
            ]
        );

        let files = InputDiscovery::new()
            .discover(&[root.join("extract*.dat")])
            .unwrap();
        assert_eq!(files, vec![root.join("extract.dat"), root.join("extract_old.dat")]);

        // Named explicitly, an output is still split
        let files = InputDiscovery::new()
            .discover(&[root.join("extract_A.dat")])
            .unwrap();
        assert_eq!(files, vec![root.join("extract_A.dat")]);
    }

    #[test]
    fn test_split_source() {
        assert_eq!(
            split_source(Path::new("in/extract_A.dat")),
            Some(PathBuf::from("in/extract.dat"))
        );
        assert_eq!(
            split_source(Path::new("many_030.txt")),
            Some(PathBuf::from("many.txt"))
        );
        assert_eq!(split_source(Path::new("extract_ab.dat")), None);
        assert_eq!(split_source(Path::new("_A.dat")), None);
        assert_eq!(split_source(Path::new("extract.dat")), None);
    }
}
