//! Debounced autosave state machine.
//!
//! Edits reset a quiet-period timer; a save becomes due once the timer has
//! elapsed with no save in flight. The debouncer is polled from the host's
//! event loop instead of owning a timer thread.

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Persistence state shown next to the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    Saved,
    Dirty,
    Saving,
    Failed,
}

/// Tracks dirty state and decides when a save should fire.
#[derive(Debug)]
pub struct AutosaveDebouncer {
    delay: Duration,
    status: SaveStatus,
    last_edit_at: Option<Instant>,
    requested_revision: Option<u64>,
}

impl AutosaveDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            status: SaveStatus::Saved,
            last_edit_at: None,
            requested_revision: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn in_flight(&self) -> bool {
        self.requested_revision.is_some()
    }

    /// Mark the draft dirty and restart the quiet period.
    pub fn note_edit(&mut self, now: Instant) {
        self.last_edit_at = Some(now);
        if self.status != SaveStatus::Saving {
            self.status = SaveStatus::Dirty;
        }
    }

    /// True when a dirty draft has been quiet for the full delay and no save is
    /// outstanding.
    pub fn due(&self, now: Instant) -> bool {
        if self.in_flight() || self.status != SaveStatus::Dirty {
            return false;
        }
        self.last_edit_at
            .map(|last_edit| now.saturating_duration_since(last_edit) >= self.delay)
            .unwrap_or(false)
    }

    /// Time left until the pending save fires, if one is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if self.in_flight() || self.status != SaveStatus::Dirty {
            return None;
        }
        let last_edit = self.last_edit_at?;
        Some(self.delay.saturating_sub(now.saturating_duration_since(last_edit)))
    }

    /// Whether an explicit save request should be dispatched now.
    pub fn can_save_now(&self) -> bool {
        !self.in_flight() && matches!(self.status, SaveStatus::Dirty | SaveStatus::Failed)
    }

    /// Record that a save of `revision` was dispatched.
    pub fn begin_save(&mut self, revision: u64) {
        debug!(revision, "autosave dispatched");
        self.requested_revision = Some(revision);
        self.status = SaveStatus::Saving;
    }

    /// Apply a save acknowledgement.
    ///
    /// A success for an older revision than `current_revision` keeps the draft
    /// dirty so the newer edits are saved too.
    pub fn finish_save(&mut self, revision: u64, current_revision: u64, ok: bool) {
        if self.requested_revision != Some(revision) {
            debug!(revision, "ignoring stale save acknowledgement");
            return;
        }
        self.requested_revision = None;
        if !ok {
            self.status = SaveStatus::Failed;
            self.last_edit_at = None;
            return;
        }
        if revision == current_revision {
            self.status = SaveStatus::Saved;
            self.last_edit_at = None;
        } else {
            self.status = SaveStatus::Dirty;
            if self.last_edit_at.is_none() {
                self.last_edit_at = Some(Instant::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1500);

    #[test]
    fn clean_debouncer_never_fires() {
        let debouncer = AutosaveDebouncer::new(DELAY);
        let now = Instant::now();
        assert_eq!(debouncer.status(), SaveStatus::Saved);
        assert!(!debouncer.due(now + DELAY * 4));
        assert_eq!(debouncer.remaining(now), None);
    }

    #[test]
    fn fires_after_quiet_period() {
        let mut debouncer = AutosaveDebouncer::new(DELAY);
        let start = Instant::now();
        debouncer.note_edit(start);
        assert!(!debouncer.due(start + Duration::from_millis(1499)));
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(500)),
            Some(Duration::from_millis(1000))
        );
        assert!(debouncer.due(start + DELAY));
    }

    #[test]
    fn new_edit_reschedules_pending_save() {
        let mut debouncer = AutosaveDebouncer::new(DELAY);
        let start = Instant::now();
        debouncer.note_edit(start);
        debouncer.note_edit(start + Duration::from_millis(1000));
        assert!(!debouncer.due(start + DELAY));
        assert!(debouncer.due(start + Duration::from_millis(2500)));
    }

    #[test]
    fn at_most_one_save_in_flight() {
        let mut debouncer = AutosaveDebouncer::new(DELAY);
        let start = Instant::now();
        debouncer.note_edit(start);
        debouncer.begin_save(1);
        debouncer.note_edit(start + Duration::from_millis(10));
        assert!(debouncer.in_flight());
        assert!(!debouncer.due(start + DELAY * 10));
        assert!(!debouncer.can_save_now());
    }

    #[test]
    fn ack_for_current_revision_marks_saved() {
        let mut debouncer = AutosaveDebouncer::new(DELAY);
        debouncer.note_edit(Instant::now());
        debouncer.begin_save(3);
        debouncer.finish_save(3, 3, true);
        assert_eq!(debouncer.status(), SaveStatus::Saved);
        assert!(!debouncer.in_flight());
    }

    #[test]
    fn ack_for_older_revision_keeps_autosave_armed() {
        let mut debouncer = AutosaveDebouncer::new(DELAY);
        let start = Instant::now();
        debouncer.note_edit(start);
        debouncer.begin_save(3);
        debouncer.note_edit(start + Duration::from_millis(100));
        debouncer.finish_save(3, 4, true);
        assert_eq!(debouncer.status(), SaveStatus::Dirty);
        assert!(debouncer.due(start + Duration::from_millis(100) + DELAY));
    }

    #[test]
    fn failure_waits_for_next_edit_or_explicit_save() {
        let mut debouncer = AutosaveDebouncer::new(DELAY);
        let start = Instant::now();
        debouncer.note_edit(start);
        debouncer.begin_save(1);
        debouncer.finish_save(1, 1, false);
        assert_eq!(debouncer.status(), SaveStatus::Failed);
        assert!(!debouncer.due(start + DELAY * 10));
        assert!(debouncer.can_save_now());

        debouncer.note_edit(start + DELAY);
        assert_eq!(debouncer.status(), SaveStatus::Dirty);
        assert!(debouncer.due(start + DELAY * 2));
    }

    #[test]
    fn stale_acknowledgements_are_ignored() {
        let mut debouncer = AutosaveDebouncer::new(DELAY);
        debouncer.note_edit(Instant::now());
        debouncer.begin_save(2);
        debouncer.finish_save(1, 2, true);
        assert!(debouncer.in_flight());
        assert_eq!(debouncer.status(), SaveStatus::Saving);
    }
}
