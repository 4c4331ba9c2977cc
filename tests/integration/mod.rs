#![allow(dead_code)]

// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

use colsplit::SplitConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture with an input file and an output directory in a temp dir
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();
        fs::create_dir_all(root_path.join("out")).expect("Failed to create output directory");

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Write an input file with given content
    pub fn create_input_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Output stub pointing into the fixture's output directory
    pub fn stub(&self) -> String {
        format!("{}/", self.output_dir().display())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root_path.join("out")
    }

    /// Config splitting `input` on `column` into the output directory
    pub fn config(&self, input: &Path, column: usize) -> SplitConfig {
        SplitConfig {
            input: input.to_path_buf(),
            column,
            output_stub: self.stub(),
            ..Default::default()
        }
    }

    /// Read an output file by name
    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output_dir().join(name))
            .unwrap_or_else(|e| panic!("Failed to read output {name}: {e}"))
    }

    /// Sorted names of every file in the output directory
    pub fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.output_dir())
            .expect("Failed to list output directory")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    /// Raw bytes of every output file keyed by name
    pub fn snapshot(&self) -> Vec<(String, Vec<u8>)> {
        self.output_names()
            .into_iter()
            .map(|name| {
                let bytes = fs::read(self.output_dir().join(&name)).unwrap();
                (name, bytes)
            })
            .collect()
    }

    /// Empty the output directory
    pub fn clear_outputs(&self) {
        fs::remove_dir_all(self.output_dir()).expect("Failed to remove output directory");
        fs::create_dir_all(self.output_dir()).expect("Failed to recreate output directory");
    }
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_lines(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines",
            context,
            expected_lines.len(),
            actual_lines.len()
        );
    }

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }
}
