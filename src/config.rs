use crate::error::{Result, SplitError};
use std::path::PathBuf;

/// Line terminator written after every output row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    #[default]
    Lf,
    Crlf,
}

/// Configuration for a single split run
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Delimited input file, sorted by `column`
    pub input: PathBuf,
    /// 1-based index of the column to split on
    pub column: usize,
    /// Prefix of every output filename, may include a directory
    pub output_stub: String,
    /// Suffix of every output filename
    pub output_suffix: String,
    /// Treat the first record as a header and repeat it in every output file
    pub use_headers: bool,
    /// Field delimiter for both input and output
    pub delimiter: u8,
    /// Warn instead of failing when a group reappears, overwriting its earlier output
    pub force: bool,
    pub terminator: LineTerminator,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            column: 1,
            output_stub: String::new(),
            output_suffix: ".tsv".to_string(),
            use_headers: true,
            delimiter: b'\t',
            force: false,
            terminator: LineTerminator::Lf,
        }
    }
}

impl SplitConfig {
    /// Reject parameters that would otherwise surface as undefined indexing
    /// or unreadable output halfway through a run.
    pub fn validate(&self) -> Result<()> {
        if self.column == 0 {
            return Err(SplitError::config("column", "columns are numbered from 1"));
        }
        if matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(SplitError::config(
                "delimiter",
                "cannot be a quote or line break character",
            ));
        }
        if self.output_stub.is_empty() && self.output_suffix.is_empty() {
            return Err(SplitError::config(
                "stub",
                "stub and suffix cannot both be empty",
            ));
        }
        Ok(())
    }

    /// Zero-based index of the split column
    pub fn column_index(&self) -> usize {
        self.column.saturating_sub(1)
    }
}

/// Parse a delimiter argument into a single byte.
///
/// Accepts a literal single ASCII character, the escape `\t`, or the names
/// `tab`, `comma`, `semicolon`, `pipe` and `space`.
pub fn parse_delimiter(text: &str) -> Result<u8> {
    let delimiter = match text {
        "\\t" | "tab" => b'\t',
        "comma" => b',',
        "semicolon" => b';',
        "pipe" => b'|',
        "space" => b' ',
        _ => {
            let bytes = text.as_bytes();
            if bytes.len() != 1 || !bytes[0].is_ascii() {
                return Err(SplitError::config(
                    "delimiter",
                    format!("expected a single ASCII character, got '{text}'"),
                ));
            }
            bytes[0]
        }
    };
    Ok(delimiter)
}
