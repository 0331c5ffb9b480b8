//! Keyboard shortcut table and input-event reducer.

use super::insertion::MarkdownFormat;
use crate::error::DraftError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Modifier state for a key press.
///
/// `command` is the platform primary modifier (Ctrl, or Cmd on macOS).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Modifiers {
    pub command: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const COMMAND: Modifiers = Modifiers {
        command: true,
        shift: false,
        alt: false,
    };

    pub const COMMAND_SHIFT: Modifiers = Modifiers {
        command: true,
        shift: true,
        alt: false,
    };
}

/// A key plus modifiers, e.g. `mod+shift+X`.
///
/// Letter keys are stored upper-case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: char,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: char, modifiers: Modifiers) -> Self {
        Self {
            key: key.to_ascii_uppercase(),
            modifiers,
        }
    }

    /// Parse chords such as `mod+B`, `Ctrl+Shift+x` or `cmd+z`.
    pub fn parse(value: &str) -> Result<Self, DraftError> {
        let invalid = || DraftError::InvalidChord(value.to_string());
        let mut modifiers = Modifiers::default();
        let mut key = None;
        for part in value.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "mod" | "ctrl" | "cmd" | "command" | "meta" => modifiers.command = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                _ => {
                    let mut chars = part.chars();
                    match (chars.next(), chars.next(), key) {
                        (Some(ch), None, None) => key = Some(ch),
                        _ => return Err(invalid()),
                    }
                }
            }
        }
        key.map(|key| Self::new(key, modifiers)).ok_or_else(invalid)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.command {
            f.write_str("mod+")?;
        }
        if self.modifiers.alt {
            f.write_str("alt+")?;
        }
        if self.modifiers.shift {
            f.write_str("shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for KeyChord {
    type Err = DraftError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Editing commands understood by [`super::EditingSession::execute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    Format(MarkdownFormat),
    Undo,
    Redo,
    InsertText(String),
    Paste(String),
    ReplaceAll(String),
}

/// Action bound to a shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortcutAction {
    Format(MarkdownFormat),
    Undo,
    Redo,
}

impl From<ShortcutAction> for EditorCommand {
    fn from(action: ShortcutAction) -> Self {
        match action {
            ShortcutAction::Format(format) => Self::Format(format),
            ShortcutAction::Undo => Self::Undo,
            ShortcutAction::Redo => Self::Redo,
        }
    }
}

/// One row of the shortcut table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ShortcutBinding {
    pub key: char,
    pub modifiers: Modifiers,
    pub action: ShortcutAction,
}

impl ShortcutBinding {
    pub fn chord(&self) -> KeyChord {
        KeyChord::new(self.key, self.modifiers)
    }
}

const fn bind(key: char, modifiers: Modifiers, action: ShortcutAction) -> ShortcutBinding {
    ShortcutBinding {
        key,
        modifiers,
        action,
    }
}

/// Static shortcut table for the markdown editor.
pub const SHORTCUTS: &[ShortcutBinding] = &[
    bind('B', Modifiers::COMMAND, ShortcutAction::Format(MarkdownFormat::Bold)),
    bind('I', Modifiers::COMMAND, ShortcutAction::Format(MarkdownFormat::Italic)),
    bind('U', Modifiers::COMMAND, ShortcutAction::Format(MarkdownFormat::Underline)),
    bind('K', Modifiers::COMMAND, ShortcutAction::Format(MarkdownFormat::Link)),
    bind('H', Modifiers::COMMAND, ShortcutAction::Format(MarkdownFormat::Heading)),
    bind('Z', Modifiers::COMMAND, ShortcutAction::Undo),
    bind('Y', Modifiers::COMMAND, ShortcutAction::Redo),
    bind('Z', Modifiers::COMMAND_SHIFT, ShortcutAction::Redo),
    bind(
        'X',
        Modifiers::COMMAND_SHIFT,
        ShortcutAction::Format(MarkdownFormat::Strikethrough),
    ),
    bind(
        'Q',
        Modifiers::COMMAND_SHIFT,
        ShortcutAction::Format(MarkdownFormat::Quote),
    ),
    bind(
        'C',
        Modifiers::COMMAND_SHIFT,
        ShortcutAction::Format(MarkdownFormat::CodeBlock),
    ),
];

/// Look up the command bound to `chord`.
pub fn command_for_chord(chord: &KeyChord) -> Option<EditorCommand> {
    let key = chord.key.to_ascii_uppercase();
    SHORTCUTS
        .iter()
        .find(|binding| binding.key == key && binding.modifiers == chord.modifiers)
        .map(|binding| binding.action.into())
}

/// Raw input delivered by the host UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key {
        key: char,
        pressed: bool,
        modifiers: Modifiers,
    },
    Text(String),
    Paste(String),
}

/// Convert raw input events into editor commands.
///
/// Nothing is produced while the editor is unfocused; key releases, unbound
/// chords and empty text or paste payloads are skipped.
pub fn commands_from_events(events: &[InputEvent], focused: bool) -> Vec<EditorCommand> {
    if !focused {
        return Vec::new();
    }
    let mut out = Vec::new();
    for event in events {
        match event {
            InputEvent::Text(text) if !text.is_empty() => {
                out.push(EditorCommand::InsertText(text.clone()));
            }
            InputEvent::Paste(text) if !text.is_empty() => {
                out.push(EditorCommand::Paste(text.clone()));
            }
            InputEvent::Text(_) | InputEvent::Paste(_) => {}
            InputEvent::Key {
                key,
                pressed: true,
                modifiers,
            } => {
                if let Some(command) = command_for_chord(&KeyChord::new(*key, *modifiers)) {
                    out.push(command);
                }
            }
            InputEvent::Key { pressed: false, .. } => {}
        }
    }
    out
}
