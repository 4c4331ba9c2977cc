//! Error types for a split run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for split operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Every condition that terminates a split run.
///
/// None of these are retried. A failed run leaves any output it already wrote
/// in place.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Invalid parameter rejected before the input is opened
    #[error("Invalid parameter '{parameter}': {reason}")]
    Config {
        parameter: String,
        reason: String,
    },

    /// Input path missing or unreadable
    #[error("Cannot read input file {}: {source}", path.display())]
    InputAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed record in the input
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// Configured column is past the end of a row
    #[error("Column {column} is out of range for record {line} which has {fields} fields")]
    ColumnRange {
        column: usize,
        fields: usize,
        line: u64,
    },

    /// A group key reappeared after its run of rows was closed
    #[error(
        "Already seen field '{key}', you probably want to sort the input file before running (line: {line}); \
         --force continues anyway but overwrites the earlier output for this field"
    )]
    OutOfOrderGroup { key: String, line: u64 },

    /// Output destination cannot be created, written or flushed
    #[error("Cannot write output file {}: {source}", path.display())]
    OutputAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    pub(crate) fn config(parameter: &str, reason: impl Into<String>) -> Self {
        SplitError::Config {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    /// Position the error refers to, when there is one.
    ///
    /// `ColumnRange` and `OutOfOrderGroup` carry the 1-based data record
    /// index (header excluded). `Parse` carries the physical input line, which
    /// runs ahead of the record index after a header or a quoted line break.
    pub fn line(&self) -> Option<u64> {
        match self {
            SplitError::Parse { line, .. }
            | SplitError::ColumnRange { line, .. }
            | SplitError::OutOfOrderGroup { line, .. } => Some(*line),
            _ => None,
        }
    }
}
