//! Group-switch detection over a column-sorted input.

use std::collections::HashMap;

/// How an incoming key relates to what has been seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTransition {
    /// Same key as the previous row
    Continue,
    /// Key never seen before in this run
    New,
    /// Key seen earlier whose run of rows was already closed
    Resumed,
}

/// Keys seen in a run with their record counts, plus the current key.
///
/// Entries are never removed, so a key that is present but not current
/// identifies an input that was not sorted by the split column.
#[derive(Debug, Default)]
pub struct GroupTracker {
    current: Option<String>,
    counts: HashMap<String, u64>,
    order: Vec<String>,
}

impl GroupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `key` against the current group and make it current.
    pub fn observe(&mut self, key: &str) -> GroupTransition {
        if self.current.as_deref() == Some(key) {
            return GroupTransition::Continue;
        }
        self.current = Some(key.to_string());
        if self.counts.contains_key(key) {
            GroupTransition::Resumed
        } else {
            GroupTransition::New
        }
    }

    /// Count one record for `key`, creating its entry on first sight.
    pub fn record(&mut self, key: &str) -> u64 {
        if let Some(count) = self.counts.get_mut(key) {
            *count += 1;
            return *count;
        }
        self.order.push(key.to_string());
        self.counts.insert(key.to_string(), 1);
        1
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn total_records(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct keys, which is also the number of output files
    pub fn group_count(&self) -> usize {
        self.counts.len()
    }

    /// Keys with their counts in first-seen order
    pub fn groups(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.order
            .iter()
            .map(move |key| (key.as_str(), self.count(key)))
    }
}
