//! Output file lifecycle for a split run.
//!
//! At most one output file is open at a time. Opening always truncates, so
//! opening a name that was already closed earlier in the run discards what was
//! written to it.

use crate::codec::{Row, RowWriter};
use crate::config::{LineTerminator, SplitConfig};
use crate::error::{Result, SplitError};
use crate::sanitize::output_filename;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

struct OpenOutput {
    key: String,
    path: PathBuf,
    writer: RowWriter<File>,
    rows_in_file: u64,
}

/// A destination that has been flushed and closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedOutput {
    pub key: String,
    pub path: PathBuf,
    /// Rows written through this handle, header excluded
    pub rows_in_file: u64,
}

/// Owns the single live output handle
pub struct OutputFileManager {
    stub: String,
    suffix: String,
    delimiter: u8,
    terminator: LineTerminator,
    open: Option<OpenOutput>,
    files_opened: u64,
}

impl OutputFileManager {
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            stub: config.output_stub.clone(),
            suffix: config.output_suffix.clone(),
            delimiter: config.delimiter,
            terminator: config.terminator,
            open: None,
            files_opened: 0,
        }
    }

    /// Destination path for a group key
    pub fn path_for(&self, key: &str) -> PathBuf {
        PathBuf::from(output_filename(&self.stub, key, &self.suffix))
    }

    /// Key bound to the open destination, if any
    pub fn current_key(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.key.as_str())
    }

    /// Number of times a destination was created, reopens included
    pub fn files_opened(&self) -> u64 {
        self.files_opened
    }

    /// Create (or truncate) the destination for `key` and make it current.
    ///
    /// `header` is written first when given. Any destination still open is
    /// closed beforehand.
    pub fn open(&mut self, key: &str, header: Option<&Row>) -> Result<&Path> {
        if let Some(previous) = self.close()? {
            debug!("Closed {} before opening a new destination", previous.path.display());
        }

        let path = self.path_for(key);
        info!("Writing to {} (field: {})", path.display(), key);

        let file = File::create(&path).map_err(|source| SplitError::OutputAccess {
            path: path.clone(),
            source,
        })?;
        let mut writer = RowWriter::new(file, self.delimiter, self.terminator);
        if let Some(header) = header {
            writer
                .write_row(header)
                .map_err(|source| SplitError::OutputAccess {
                    path: path.clone(),
                    source,
                })?;
        }

        self.files_opened += 1;
        let open = self.open.insert(OpenOutput {
            key: key.to_string(),
            path,
            writer,
            rows_in_file: 0,
        });
        Ok(&open.path)
    }

    /// Append a row to the open destination
    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        let open = self.open.as_mut().ok_or_else(|| SplitError::OutputAccess {
            path: PathBuf::new(),
            source: io::Error::new(io::ErrorKind::Other, "no output file is open"),
        })?;
        open.writer
            .write_row(row)
            .map_err(|source| SplitError::OutputAccess {
                path: open.path.clone(),
                source,
            })?;
        open.rows_in_file += 1;
        Ok(())
    }

    /// Flush and release the open destination. Returns `None` when nothing was open.
    pub fn close(&mut self) -> Result<Option<ClosedOutput>> {
        let Some(open) = self.open.take() else {
            return Ok(None);
        };
        let OpenOutput {
            key,
            path,
            writer,
            rows_in_file,
        } = open;
        writer.finish().map_err(|source| SplitError::OutputAccess {
            path: path.clone(),
            source,
        })?;
        Ok(Some(ClosedOutput {
            key,
            path,
            rows_in_file,
        }))
    }

    /// Best-effort flush and release after a fatal error. The partial file is kept.
    pub fn abandon(&mut self) {
        if let Some(mut open) = self.open.take() {
            if let Err(e) = open.writer.flush() {
                warn!("Failed to flush {} while aborting: {}", open.path.display(), e);
            }
        }
    }
}
