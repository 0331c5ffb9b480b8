//! Root crate facade for the inkdraft editing core.

pub use inkdraft_core::{
    autosave, config, constants, draft, editor, error, preview, store, text, worker,
    AutosaveDebouncer, Config, ContentStore, DraftEditor, DraftError, EditingSession,
    EditorCommand, FileStore, Heading, KeyChord, MarkdownFormat, MemoryStore, SaveStatus,
    Selection, SnapshotHistory,
};
