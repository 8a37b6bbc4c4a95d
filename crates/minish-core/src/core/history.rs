//! Bounded command history.

use std::collections::VecDeque;

use crate::config::MAX_COMMAND_HISTORY;

/// Lines entered by the user, oldest first.
///
/// When the history is full, adding a line drops the oldest one. Blank
/// lines and immediate repeats are not recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for InputHistory {
    fn default() -> Self {
        Self::new(MAX_COMMAND_HISTORY)
    }
}

impl InputHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a history from saved lines, keeping only the newest that fit.
    pub fn from_entries(capacity: usize, entries: impl IntoIterator<Item = String>) -> Self {
        let mut history = Self::new(capacity);
        for entry in entries {
            history.add(&entry);
        }
        history
    }

    /// Record a line. Returns `false` if it was skipped.
    pub fn add(&mut self, line: &str) -> bool {
        if self.capacity == 0 || line.trim().is_empty() {
            return false;
        }
        if self.entries.back().is_some_and(|last| last == line) {
            return false;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line.to_string());
        true
    }

    /// The entry `index` steps back; `0` is the most recent line.
    pub fn get(&self, index: usize) -> Option<&str> {
        let position = self.entries.len().checked_sub(index)?.checked_sub(1)?;
        self.entries.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
