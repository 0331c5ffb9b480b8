//! Session driver gluing the editing model to autosave and persistence.

use crate::autosave::{AutosaveDebouncer, SaveStatus};
use crate::config::Config;
use crate::editor::{
    commands_from_events, EditOutcome, EditingSession, EditorCommand, InputEvent, Selection,
};
use crate::error::DraftError;
use crate::preview::{render_html_with, transform, RenderOptions};
use crate::store::ContentStore;
use crate::worker::{spawn_save_worker, SaveCmd, SaveEvent, SaveWorkerHandle};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// One open draft: editing session, autosave timer, and save worker.
///
/// The host calls [`DraftEditor::tick`] from its event loop. Save failures
/// never touch the buffer or history; they surface through
/// [`DraftEditor::take_notice`].
pub struct DraftEditor {
    session: EditingSession,
    autosave: AutosaveDebouncer,
    worker: SaveWorkerHandle,
    render_options: RenderOptions,
    last_saved_at: Option<DateTime<Utc>>,
    notice: Option<String>,
}

impl DraftEditor {
    /// Load the draft from `store` and start its save worker.
    ///
    /// # Errors
    /// Returns the store's error when the initial load fails.
    pub fn open<S: ContentStore>(store: S, config: &Config) -> Result<Self, DraftError> {
        let initial = store.load()?.unwrap_or_default();
        info!(
            bytes = initial.len(),
            autosave_ms = config.autosave_delay_ms,
            "draft opened"
        );
        Ok(Self {
            session: EditingSession::with_history_limit(&initial, config.history_limit),
            autosave: AutosaveDebouncer::new(config.autosave_delay()),
            worker: spawn_save_worker(store),
            render_options: RenderOptions {
                expand_embeds: config.render_embeds,
            },
            last_saved_at: None,
            notice: None,
        })
    }

    pub fn session(&self) -> &EditingSession {
        &self.session
    }

    pub fn buffer(&self) -> &str {
        self.session.buffer()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.session.set_selection(selection);
    }

    pub fn take_pending_selection(&mut self) -> Option<Selection> {
        self.session.take_pending_selection()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    pub fn status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// User-facing message for the toast layer, cleared on read.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Run a command and arm autosave when the buffer changed.
    pub fn execute(&mut self, command: &EditorCommand, now: Instant) -> Option<EditOutcome> {
        let outcome = self.session.execute(command)?;
        if outcome.changed {
            self.autosave.note_edit(now);
        }
        Some(outcome)
    }

    /// Reduce raw input to commands and run them in order.
    pub fn handle_events(
        &mut self,
        events: &[InputEvent],
        focused: bool,
        now: Instant,
    ) -> Vec<EditOutcome> {
        commands_from_events(events, focused)
            .iter()
            .filter_map(|command| self.execute(command, now))
            .collect()
    }

    /// Transformed markdown for the preview pane.
    pub fn preview_markdown(&self) -> Cow<'_, str> {
        transform(self.session.buffer())
    }

    /// Rendered HTML for the preview pane.
    pub fn preview_html(&self) -> String {
        render_html_with(self.session.buffer(), self.render_options)
    }

    /// Drain worker replies and fire a due autosave.
    ///
    /// # Returns
    /// `true` when a save was dispatched during this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        while let Ok(event) = self.worker.evt_rx.try_recv() {
            self.apply_event(event);
        }
        if !self.autosave.due(now) {
            return false;
        }
        self.dispatch_save("Autosave").is_ok()
    }

    /// Save immediately, skipping the quiet period.
    ///
    /// # Returns
    /// `Ok(false)` when there is nothing to save or a save is already in flight.
    pub fn save_now(&mut self) -> Result<bool, DraftError> {
        if !self.autosave.can_save_now() {
            return Ok(false);
        }
        self.dispatch_save("Save").map(|()| true)
    }

    fn dispatch_save(&mut self, mode: &str) -> Result<(), DraftError> {
        let revision = self.session.revision();
        self.autosave.begin_save(revision);
        let command = SaveCmd::Persist {
            revision,
            content: self.session.buffer().to_string(),
        };
        if self.worker.cmd_tx.send(command).is_err() {
            self.autosave.finish_save(revision, revision, false);
            self.notice = Some(format!("{} failed: save worker unavailable.", mode));
            return Err(DraftError::WorkerUnavailable);
        }
        Ok(())
    }

    fn apply_event(&mut self, event: SaveEvent) {
        let current = self.session.revision();
        debug!(revision = event.revision(), current, "save acknowledged");
        match event {
            SaveEvent::Saved { revision, saved_at } => {
                self.autosave.finish_save(revision, current, true);
                self.last_saved_at = Some(saved_at);
            }
            SaveEvent::Failed { revision, message } => {
                warn!(revision, "save failed; local edits kept");
                self.autosave.finish_save(revision, current, false);
                self.notice = Some(format!("Save failed: {}", message));
            }
        }
    }

    /// Flush pending edits and wait for the worker to acknowledge them.
    ///
    /// # Returns
    /// The final [`SaveStatus`]; `Saving` when the worker did not answer within
    /// `timeout`.
    pub fn shutdown(mut self, timeout: Duration) -> SaveStatus {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.autosave.in_flight()
                && self.status() == SaveStatus::Dirty
                && self.dispatch_save("Save").is_err()
            {
                return self.status();
            }
            if !self.autosave.in_flight() {
                return self.status();
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.worker.evt_rx.recv_timeout(remaining) {
                Ok(event) => self.apply_event(event),
                Err(_) => return self.status(),
            }
        }
    }
}
