//! Core editing library for inkdraft (markdown editing model, preview, autosave).

/// Debounced autosave state machine.
pub mod autosave;
/// Configuration loading and defaults.
pub mod config;
/// Shared defaults used across inkdraft crates.
pub mod constants;
/// Session driver gluing editing, autosave, and persistence.
pub mod draft;
/// Markdown editing model: insertion, history, shortcuts, sessions.
pub mod editor;
/// Error types for persistence and input parsing.
pub mod error;
/// Markdown preview: embed rewriting, heading anchors, HTML rendering.
pub mod preview;
/// Content storage collaborators.
pub mod store;
/// Char/byte offset helpers.
pub mod text;
/// Background save worker.
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use autosave::{AutosaveDebouncer, SaveStatus};
pub use config::Config;
pub use constants::{DEFAULT_AUTOSAVE_DELAY_MS, DEFAULT_HISTORY_LIMIT};
pub use draft::DraftEditor;
pub use editor::{
    EditingSession, EditorCommand, KeyChord, MarkdownFormat, Selection, SnapshotHistory,
};
pub use error::DraftError;
pub use preview::{extract_headings, render_html, transform, Heading};
pub use store::{ContentStore, FileStore, MemoryStore};
