// Run summary reported at the end of a split and written by --stats-out

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Per-group outcome of a split run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    /// Group key as read from the input
    pub key: String,
    /// Destination the group was written to
    pub path: String,
    /// Records counted for the key across the whole run
    pub records: u64,
    /// Rows in the destination as last written. Lower than `records` when the
    /// key was resumed under --force and its earlier rows were overwritten.
    pub rows_in_file: u64,
    /// Rows discarded by --force reopens, so `records - records_overwritten`
    /// equals `rows_in_file`
    #[serde(default)]
    pub records_overwritten: u64,
}

/// Overall outcome of a split run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SplitSummary {
    pub input: String,
    pub column: usize,
    /// Data records read and written, header excluded
    pub total_records: u64,
    /// Distinct group keys, one output file each
    pub total_files: usize,
    /// Destinations created, counting reopens of resumed keys
    pub files_opened: u64,
    /// Keys that reappeared out of order (only non-empty under --force)
    pub resumed_groups: Vec<String>,
    /// Groups in first-seen order
    pub groups: Vec<GroupSummary>,
    pub elapsed_ms: u64,
}

impl SplitSummary {
    pub fn group(&self, key: &str) -> Option<&GroupSummary> {
        self.groups.iter().find(|group| group.key == key)
    }

    /// Write the summary as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn summary() -> SplitSummary {
        SplitSummary {
            input: "in.tsv".to_string(),
            column: 2,
            total_records: 3,
            total_files: 2,
            files_opened: 2,
            resumed_groups: Vec::new(),
            groups: vec![
                GroupSummary {
                    key: "A".to_string(),
                    path: "out-A.tsv".to_string(),
                    records: 2,
                    rows_in_file: 2,
                    records_overwritten: 0,
                },
                GroupSummary {
                    key: "B".to_string(),
                    path: "out-B.tsv".to_string(),
                    records: 1,
                    rows_in_file: 1,
                    records_overwritten: 0,
                },
            ],
            elapsed_ms: 5,
        }
    }

    #[test]
    fn test_group_lookup() {
        let summary = summary();
        assert_eq!(summary.group("B").unwrap().records, 1);
        assert!(summary.group("C").is_none());
    }

    #[test]
    fn test_write_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        summary().write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_records"], 3);
        assert_eq!(value["total_files"], 2);
        assert_eq!(value["groups"][0]["key"], "A");
        assert_eq!(value["groups"][1]["path"], "out-B.tsv");
        assert_eq!(value["groups"][0]["records_overwritten"], 0);
        assert!(value["resumed_groups"].as_array().unwrap().is_empty());
    }
}
