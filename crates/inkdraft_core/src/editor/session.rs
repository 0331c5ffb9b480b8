//! Explicit editing session owning buffer, selection, and history.

use super::history::SnapshotHistory;
use super::insertion::{insert_text, Insertion, MarkdownFormat};
use super::selection::Selection;
use super::shortcuts::{command_for_chord, EditorCommand, KeyChord};
use crate::text::char_len;

/// Summary of one command applied to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    /// Buffer content differs from before the command.
    pub changed: bool,
    /// Caret the UI should restore after re-rendering.
    pub cursor: usize,
}

/// In-memory editing state for one document.
///
/// Every buffer mutation goes through [`EditingSession::apply_edit`], which
/// records history exactly once per distinct buffer value.
#[derive(Clone, Debug)]
pub struct EditingSession {
    buffer: String,
    selection: Selection,
    history: SnapshotHistory,
    revision: u64,
    pending_selection: Option<Selection>,
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new("")
    }
}

impl EditingSession {
    /// Start a session seeded with persisted content.
    pub fn new(initial: &str) -> Self {
        Self::with_history_limit(initial, crate::constants::DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(initial: &str, history_limit: usize) -> Self {
        let mut history = SnapshotHistory::with_limit(history_limit);
        history.record(initial);
        Self {
            buffer: initial.to_string(),
            selection: Selection::collapsed(char_len(initial)),
            history,
            revision: 0,
            pending_selection: None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Update the selection from UI focus state, clamped to the buffer.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp(char_len(&self.buffer));
    }

    /// Monotonic counter bumped on every buffer change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Selection the UI must apply once its text surface shows the new buffer.
    ///
    /// Cleared on read; the caret is only restored once per edit.
    pub fn take_pending_selection(&mut self) -> Option<Selection> {
        self.pending_selection.take()
    }

    /// Replace the buffer and record it in history.
    pub fn apply_edit(&mut self, new_buffer: String, cursor: usize) -> EditOutcome {
        let changed = self.set_buffer(new_buffer, cursor);
        if changed {
            self.history.record(self.buffer.as_str());
        }
        EditOutcome {
            changed,
            cursor: self.selection.end,
        }
    }

    fn set_buffer(&mut self, new_buffer: String, cursor: usize) -> bool {
        let changed = new_buffer != self.buffer;
        if changed {
            self.buffer = new_buffer;
            self.revision = self.revision.wrapping_add(1);
        }
        let caret = Selection::collapsed(cursor).clamp(char_len(&self.buffer));
        self.selection = caret;
        self.pending_selection = Some(caret);
        changed
    }

    fn apply_insertion(&mut self, insertion: Insertion) -> EditOutcome {
        self.apply_edit(insertion.buffer, insertion.cursor)
    }

    /// Wrap the current selection with a markdown format.
    pub fn format(&mut self, format: MarkdownFormat) -> EditOutcome {
        let insertion = format.apply(&self.buffer, self.selection);
        self.apply_insertion(insertion)
    }

    /// Insert typed text over the current selection.
    pub fn type_text(&mut self, text: &str) -> EditOutcome {
        let insertion = insert_text(&self.buffer, self.selection, text);
        self.apply_insertion(insertion)
    }

    /// Paste clipboard text over the current selection.
    pub fn paste(&mut self, text: &str) -> EditOutcome {
        self.type_text(text)
    }

    /// Programmatically replace the whole buffer, caret at the end.
    pub fn replace_all(&mut self, content: &str) -> EditOutcome {
        self.apply_edit(content.to_string(), char_len(content))
    }

    /// Step back one snapshot; the caret moves to the end of the restored text.
    ///
    /// # Returns
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<EditOutcome> {
        let snapshot = self.history.undo()?.to_string();
        Some(self.restore(snapshot))
    }

    /// Step forward one snapshot.
    ///
    /// # Returns
    /// `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<EditOutcome> {
        let snapshot = self.history.redo()?.to_string();
        Some(self.restore(snapshot))
    }

    // Undo/redo move through history without recording into it.
    fn restore(&mut self, snapshot: String) -> EditOutcome {
        let cursor = char_len(&snapshot);
        let changed = self.set_buffer(snapshot, cursor);
        EditOutcome { changed, cursor }
    }

    /// Run one editor command.
    ///
    /// # Returns
    /// `None` for undo/redo at a history boundary.
    pub fn execute(&mut self, command: &EditorCommand) -> Option<EditOutcome> {
        match command {
            EditorCommand::Format(format) => Some(self.format(*format)),
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::InsertText(text) => Some(self.type_text(text)),
            EditorCommand::Paste(text) => Some(self.paste(text)),
            EditorCommand::ReplaceAll(content) => Some(self.replace_all(content)),
        }
    }

    /// Dispatch a key chord through the shortcut table.
    ///
    /// # Returns
    /// `None` when the chord is unbound or the command was a no-op boundary.
    pub fn handle_chord(&mut self, chord: &KeyChord) -> Option<EditOutcome> {
        let command = command_for_chord(chord)?;
        self.execute(&command)
    }
}
