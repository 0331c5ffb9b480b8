//! Plain-markdown editing model.

pub mod history;
pub mod insertion;
pub mod selection;
pub mod session;
pub mod shortcuts;

pub use history::SnapshotHistory;
pub use insertion::{insert, insert_text, Insertion, MarkdownFormat};
pub use selection::Selection;
pub use session::{EditOutcome, EditingSession};
pub use shortcuts::{
    command_for_chord, commands_from_events, EditorCommand, InputEvent, KeyChord, Modifiers,
    ShortcutAction, ShortcutBinding, SHORTCUTS,
};
