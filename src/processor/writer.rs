//! Output writing for split results
//!
//! Every destination is first written to a temporary file in the target
//! directory and only renamed into place once all writes succeeded. A
//! temporary file that is dropped early removes itself.

use crate::app::services::output_assembler::OutputNaming;
use crate::config::OutputFormat;
use crate::error::{Result, SplitError};
use crate::models::OutputFile;

use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Write output files into a zip archive
///
/// Entries use a fixed timestamp so identical outputs give identical bytes.
pub fn write_archive<W: Write + Seek>(sink: W, files: &[OutputFile]) -> Result<W> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut archive = ZipWriter::new(sink);
    for file in files {
        archive.start_file(file.name.as_str(), options)?;
        archive.write_all(file.contents.as_bytes())?;
    }

    Ok(archive.finish()?)
}

/// Writes the outputs of one input to a directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    format: OutputFormat,
    directory: PathBuf,
    force: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, directory: PathBuf, force: bool) -> Self {
        Self {
            format,
            directory,
            force,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Paths this writer would produce for `files`
    pub fn destinations(&self, naming: &OutputNaming, files: &[OutputFile]) -> Vec<PathBuf> {
        match self.format {
            OutputFormat::Zip => vec![self.directory.join(naming.archive_name())],
            OutputFormat::Files => files
                .iter()
                .map(|file| self.directory.join(&file.name))
                .collect(),
        }
    }

    /// Write all outputs, returning the written paths
    ///
    /// On failure nothing written by this call is left in place.
    pub fn write(&self, naming: &OutputNaming, files: &[OutputFile]) -> Result<Vec<PathBuf>> {
        let destinations = self.destinations(naming, files);
        for destination in &destinations {
            self.check_destination(destination)?;
        }

        fs::create_dir_all(&self.directory)?;

        match self.format {
            OutputFormat::Zip => {
                let path = &destinations[0];
                let temp = NamedTempFile::new_in(&self.directory)?;
                let temp = write_archive(temp, files)?;
                self.persist(temp, path)?;
                debug!("Wrote {} entries to {}", files.len(), path.display());
            }
            OutputFormat::Files => {
                let mut staged = Vec::with_capacity(files.len());
                for file in files {
                    let mut temp = NamedTempFile::new_in(&self.directory)?;
                    temp.write_all(file.contents.as_bytes())?;
                    temp.flush()?;
                    staged.push(temp);
                }

                let mut persisted: Vec<&Path> = Vec::with_capacity(destinations.len());
                for (temp, path) in staged.into_iter().zip(&destinations) {
                    if let Err(error) = self.persist(temp, path) {
                        remove_persisted(&persisted);
                        return Err(error);
                    }
                    persisted.push(path);
                }
                debug!(
                    "Wrote {} files to {}",
                    destinations.len(),
                    self.directory.display()
                );
            }
        }

        Ok(destinations)
    }

    fn check_destination(&self, path: &Path) -> Result<()> {
        if !self.force && path.exists() {
            return Err(SplitError::OutputExists {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn persist(&self, temp: NamedTempFile, path: &Path) -> Result<()> {
        let persisted = if self.force {
            temp.persist(path)
        } else {
            temp.persist_noclobber(path)
        };

        persisted.map(|_| ()).map_err(|error| {
            if error.error.kind() == std::io::ErrorKind::AlreadyExists {
                SplitError::OutputExists {
                    path: path.to_path_buf(),
                }
            } else {
                SplitError::Io(error.error)
            }
        })
    }
}

/// Undo a partially persisted run
fn remove_persisted(paths: &[&Path]) {
    for path in paths {
        if let Err(error) = fs::remove_file(path) {
            warn!("Failed to remove partial output {}: {}", path.display(), error);
        }
    }
}
