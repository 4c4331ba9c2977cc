//! Row parsing and serialization for delimited text.
//!
//! [`RowReader`] streams an input into [`Row`]s and [`RowWriter`] writes them
//! back with minimal quoting. Both sit on the `csv` crate configured with a
//! single-byte delimiter, `"` as the quote character, doubled quotes as the
//! escape, and no field-count checking.

use crate::config::LineTerminator;
use crate::error::{Result, SplitError};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// One input record as an ordered sequence of fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(StringRecord);

impl Row {
    pub fn from_fields<I, T>(fields: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut record = StringRecord::new();
        for field in fields {
            record.push_field(field.as_ref());
        }
        Row(record)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field at a zero-based index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Byte-level tracker sitting under the csv reader.
///
/// The csv parser accepts a quoted field left open at end of input and hands
/// back everything up to EOF as its content, and it drops blank lines without
/// a trace. This adapter follows the same quoting rules over the raw bytes so
/// the reader can tell when the first happened (and on which line the quote
/// was opened) and where every blank line sits.
struct QuoteTracker<R> {
    inner: R,
    delimiter: u8,
    state: QuoteState,
    line: u64,
    quote_line: u64,
    bytes_read: u64,
    exhausted: bool,
    at_line_start: bool,
    prev_cr: bool,
    /// Byte offsets of the terminators of blank lines not yet handed out
    blank_lines: VecDeque<u64>,
}

impl<R: Read> QuoteTracker<R> {
    fn new(inner: R, delimiter: u8) -> Self {
        Self {
            inner,
            delimiter,
            state: QuoteState::FieldStart,
            line: 1,
            quote_line: 0,
            bytes_read: 0,
            exhausted: false,
            at_line_start: true,
            prev_cr: false,
            blank_lines: VecDeque::new(),
        }
    }

    fn step(&mut self, byte: u8, offset: u64) {
        let is_terminator = byte == b'\n' || byte == b'\r';
        // "\r\n" is one terminator, not a line break followed by a blank line.
        if is_terminator
            && self.at_line_start
            && self.state == QuoteState::FieldStart
            && !(byte == b'\n' && self.prev_cr)
        {
            self.blank_lines.push_back(offset);
        }

        let ends_field = byte == self.delimiter || is_terminator;
        self.state = match self.state {
            QuoteState::FieldStart if byte == b'"' => {
                self.quote_line = self.line;
                QuoteState::Quoted
            }
            QuoteState::FieldStart | QuoteState::Unquoted | QuoteState::QuoteInQuoted
                if ends_field =>
            {
                QuoteState::FieldStart
            }
            QuoteState::FieldStart | QuoteState::Unquoted => QuoteState::Unquoted,
            QuoteState::Quoted if byte == b'"' => QuoteState::QuoteInQuoted,
            QuoteState::Quoted => QuoteState::Quoted,
            QuoteState::QuoteInQuoted if byte == b'"' => QuoteState::Quoted,
            QuoteState::QuoteInQuoted => QuoteState::Unquoted,
        };

        self.at_line_start = is_terminator && self.state == QuoteState::FieldStart;
        self.prev_cr = byte == b'\r';
        if byte == b'\n' {
            self.line += 1;
        }
    }

    /// Line of the still-open quote once the whole input has been consumed
    fn unterminated_quote(&self) -> Option<u64> {
        (self.exhausted && self.state == QuoteState::Quoted).then_some(self.quote_line)
    }

    /// Hand out the next blank line if it sits before byte offset `limit`
    fn take_blank_before(&mut self, limit: u64) -> bool {
        if self.blank_lines.front().is_some_and(|&offset| offset < limit) {
            self.blank_lines.pop_front();
            return true;
        }
        false
    }
}

impl<R: Read> Read for QuoteTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.exhausted = true;
        }
        for (i, &byte) in buf[..n].iter().enumerate() {
            self.step(byte, self.bytes_read + i as u64);
        }
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// Lazy sequence of rows read from a delimited input.
///
/// A blank line comes back as a row with no fields, in input order, so it
/// keeps its place in record numbering. Iteration stops after the first error.
pub struct RowReader<R: Read> {
    inner: csv::Reader<QuoteTracker<R>>,
    source: PathBuf,
    /// Next record (or the error reading it) waiting behind blank lines,
    /// with the byte offset the parser had reached
    pending: Option<(Result<Row>, u64)>,
    done: bool,
    failed: bool,
}

impl RowReader<File> {
    /// Open `path` for reading, failing with `InputAccess` when it is missing
    /// or unreadable.
    pub fn from_path(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path).map_err(|source| SplitError::InputAccess {
            path: path.to_path_buf(),
            source,
        })?;
        if file.metadata().map(|m| m.is_dir()).unwrap_or(false) {
            return Err(SplitError::InputAccess {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "path is a directory"),
            });
        }
        let mut reader = Self::new(file, delimiter);
        reader.source = path.to_path_buf();
        Ok(reader)
    }
}

impl<R: Read> RowReader<R> {
    pub fn new(reader: R, delimiter: u8) -> Self {
        let inner = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(QuoteTracker::new(reader, delimiter));
        Self {
            inner,
            source: PathBuf::from("-"),
            pending: None,
            done: false,
            failed: false,
        }
    }

    fn convert(&self, err: csv::Error) -> SplitError {
        let line = err
            .position()
            .map(|pos| pos.line())
            .unwrap_or_else(|| self.inner.position().line());
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => SplitError::InputAccess {
                path: self.source.clone(),
                source,
            },
            _ => SplitError::Parse { line, reason },
        }
    }

    fn read_record(&mut self) -> Result<Option<Row>> {
        let mut record = StringRecord::new();
        match self.inner.read_record(&mut record) {
            Ok(true) => {
                let tracker = self.inner.get_ref();
                // Only the record that ran into EOF can hold the open quote.
                if let Some(line) = tracker.unterminated_quote() {
                    if self.inner.position().byte() >= tracker.bytes_read {
                        return Err(SplitError::Parse {
                            line,
                            reason: "unterminated quoted field".to_string(),
                        });
                    }
                }
                Ok(Some(Row(record)))
            }
            Ok(false) => Ok(None),
            Err(err) => Err(self.convert(err)),
        }
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.pending.is_none() && !self.done {
            let next = self.read_record().transpose();
            let end = self.inner.position().byte();
            match next {
                Some(next) => self.pending = Some((next, end)),
                None => self.done = true,
            }
        }

        // Blank lines the parser skipped ahead of the pending record (or
        // before EOF) come out first.
        let limit = self.pending.as_ref().map_or(u64::MAX, |(_, end)| *end);
        if self.inner.get_mut().take_blank_before(limit) {
            return Some(Ok(Row::default()));
        }
        let (next, _) = self.pending.take()?;
        if next.is_err() {
            self.failed = true;
        }
        Some(next)
    }
}

/// Writes rows as delimited lines, quoting only fields that need it
pub struct RowWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> RowWriter<W> {
    pub fn new(writer: W, delimiter: u8, terminator: LineTerminator) -> Self {
        let terminator = match terminator {
            LineTerminator::Lf => Terminator::Any(b'\n'),
            LineTerminator::Crlf => Terminator::CRLF,
        };
        let inner = WriterBuilder::new()
            .delimiter(delimiter)
            .quote_style(QuoteStyle::Necessary)
            .double_quote(true)
            .flexible(true)
            .terminator(terminator)
            .from_writer(writer);
        Self { inner }
    }

    pub fn write_row(&mut self, row: &Row) -> io::Result<()> {
        self.inner.write_record(&row.0).map_err(io::Error::from)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Flush buffered rows and hand back the underlying writer
    pub fn finish(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|err| err.into_error())
    }
}
