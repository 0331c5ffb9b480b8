//! Undo/redo history over whole-buffer snapshots.

use crate::constants::DEFAULT_HISTORY_LIMIT;

/// Linear snapshot history with a current-position index.
///
/// Recording a new snapshot after an undo discards the redo tail.
#[derive(Clone, Debug)]
pub struct SnapshotHistory {
    entries: Vec<String>,
    index: Option<usize>,
    max_entries: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotHistory {
    /// Empty history; nothing to undo or redo.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Empty history keeping at most `max_entries` snapshots (minimum 1).
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            max_entries: max_entries.max(1),
        }
    }

    /// History holding `initial` as its only, current entry.
    pub fn seeded(initial: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.record(initial.into());
        history
    }

    /// Record a buffer snapshot.
    ///
    /// A snapshot equal to the current entry is ignored. Otherwise entries
    /// after the current index are dropped before appending.
    ///
    /// # Returns
    /// `true` when a new entry was appended.
    pub fn record(&mut self, snapshot: impl Into<String>) -> bool {
        let snapshot = snapshot.into();
        if self.current() == Some(snapshot.as_str()) {
            return false;
        }
        let keep = self.index.map_or(0, |index| index + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        self.index = Some(self.entries.len() - 1);
        self.trim();
        true
    }

    fn trim(&mut self) {
        let overflow = self.entries.len().saturating_sub(self.max_entries);
        if overflow == 0 {
            return;
        }
        self.entries.drain(..overflow);
        // The current entry is always the newest one right after a record.
        self.index = self.index.map(|index| index.saturating_sub(overflow));
    }

    /// Step back one snapshot.
    ///
    /// # Returns
    /// The now-current snapshot, or `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&str> {
        let index = self.index.filter(|index| *index > 0)?;
        self.index = Some(index - 1);
        self.current()
    }

    /// Step forward one snapshot.
    ///
    /// # Returns
    /// The now-current snapshot, or `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&str> {
        let index = self.index?;
        if index + 1 >= self.entries.len() {
            return None;
        }
        self.index = Some(index + 1);
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.index, Some(index) if index > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.index, Some(index) if index + 1 < self.entries.len())
    }

    /// Snapshot at the current index.
    pub fn current(&self) -> Option<&str> {
        self.index
            .and_then(|index| self.entries.get(index))
            .map(String::as_str)
    }

    /// Current index, `None` while the history is empty.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Drop every entry and start over from `initial`.
    pub fn reset(&mut self, initial: impl Into<String>) {
        self.entries.clear();
        self.index = None;
        self.record(initial);
    }
}
