//! Single-pass split driver.
//!
//! Reads rows in order, extracts the group key, asks the [`GroupTracker`]
//! whether the key continues the current group, starts a new one, or resumes
//! one that was already closed, and moves the [`OutputFileManager`] along
//! accordingly.

use crate::codec::{Row, RowReader};
use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::output::{ClosedOutput, OutputFileManager};
use crate::summary::{GroupSummary, SplitSummary};
use crate::tracker::{GroupTracker, GroupTransition};
use std::collections::HashMap;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Splits one input file into per-group output files
#[derive(Debug, Clone)]
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split the configured input file.
    ///
    /// Fails before any output is created when the configuration is invalid
    /// or the input cannot be opened.
    pub fn run(&self) -> Result<SplitSummary> {
        self.config.validate()?;
        let rows = RowReader::from_path(&self.config.input, self.config.delimiter)?;
        self.split_rows(rows)
    }

    /// Split rows read from an arbitrary reader. Outputs still go to files
    /// named from the configured stub and suffix.
    pub fn run_from_reader<R: Read>(&self, reader: R) -> Result<SplitSummary> {
        self.config.validate()?;
        self.split_rows(RowReader::new(reader, self.config.delimiter))
    }

    fn split_rows<R: Read>(&self, mut rows: RowReader<R>) -> Result<SplitSummary> {
        let start = Instant::now();
        info!(
            "Splitting {} on column {}",
            self.config.input.display(),
            self.config.column
        );

        let header = if self.config.use_headers {
            rows.next().transpose()?
        } else {
            None
        };
        if let Some(header) = &header {
            debug!("Header has {} fields", header.len());
        }

        let mut run = SplitRun::new(&self.config, header);
        match run.stream(rows) {
            Ok(()) => run.finish(start),
            Err(e) => {
                run.outputs.abandon();
                Err(e)
            }
        }
    }
}

/// State of one pass over the input
struct SplitRun<'a> {
    config: &'a SplitConfig,
    header: Option<Row>,
    tracker: GroupTracker,
    outputs: OutputFileManager,
    closed: HashMap<String, ClosedOutput>,
    /// Rows discarded per key by --force reopens
    overwritten: HashMap<String, u64>,
    resumed: Vec<String>,
}

impl<'a> SplitRun<'a> {
    fn new(config: &'a SplitConfig, header: Option<Row>) -> Self {
        Self {
            config,
            header,
            tracker: GroupTracker::new(),
            outputs: OutputFileManager::new(config),
            closed: HashMap::new(),
            overwritten: HashMap::new(),
            resumed: Vec::new(),
        }
    }

    fn stream<R: Read>(&mut self, rows: RowReader<R>) -> Result<()> {
        let column = self.config.column_index();
        for (index, row) in rows.enumerate() {
            let line = index as u64 + 1;
            let row = row?;
            let key = row.get(column).ok_or(SplitError::ColumnRange {
                column: self.config.column,
                fields: row.len(),
                line,
            })?;

            match self.tracker.observe(key) {
                GroupTransition::Continue => {}
                GroupTransition::New => {
                    self.close_current()?;
                    self.outputs.open(key, self.header.as_ref())?;
                }
                GroupTransition::Resumed => {
                    if !self.config.force {
                        return Err(SplitError::OutOfOrderGroup {
                            key: key.to_string(),
                            line,
                        });
                    }
                    // Only the rows of the last pass over this key are still on disk.
                    let lost = self.closed.get(key).map_or(0, |closed| closed.rows_in_file);
                    warn!(
                        "Already seen field '{}', you probably want to sort the input file before running (line: {}); \
                         --force is set so {} is being overwritten and its {} earlier records are lost",
                        key,
                        line,
                        self.outputs.path_for(key).display(),
                        lost
                    );
                    *self.overwritten.entry(key.to_string()).or_default() += lost;
                    if !self.resumed.iter().any(|k| k == key) {
                        self.resumed.push(key.to_string());
                    }
                    self.close_current()?;
                    // The file was created earlier in this run, so no header again.
                    self.outputs.open(key, None)?;
                }
            }

            self.outputs.write_row(&row)?;
            self.tracker.record(key);
        }
        Ok(())
    }

    fn close_current(&mut self) -> Result<()> {
        if let Some(closed) = self.outputs.close()? {
            info!(
                " ... wrote {} records (field: {})",
                self.tracker.count(&closed.key),
                closed.key
            );
            self.closed.insert(closed.key.clone(), closed);
        }
        Ok(())
    }

    fn finish(mut self, start: Instant) -> Result<SplitSummary> {
        self.close_current()?;

        let total_records = self.tracker.total_records();
        let total_files = self.tracker.group_count();
        info!("Wrote {} records to {} files", total_records, total_files);
        if !self.resumed.is_empty() {
            warn!(
                "{} fields were resumed out of order and their earlier output overwritten: {}",
                self.resumed.len(),
                self.resumed.join(", ")
            );
        }
        info!("Done");

        let groups = self
            .tracker
            .groups()
            .map(|(key, records)| {
                let (path, rows_in_file) = match self.closed.get(key) {
                    Some(closed) => (closed.path.clone(), closed.rows_in_file),
                    None => (self.outputs.path_for(key), 0),
                };
                GroupSummary {
                    key: key.to_string(),
                    path: path.display().to_string(),
                    records,
                    rows_in_file,
                    records_overwritten: self.overwritten.get(key).copied().unwrap_or(0),
                }
            })
            .collect();

        Ok(SplitSummary {
            input: self.config.input.display().to_string(),
            column: self.config.column,
            total_records,
            total_files,
            files_opened: self.outputs.files_opened(),
            resumed_groups: self.resumed,
            groups,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}
