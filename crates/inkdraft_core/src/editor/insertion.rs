//! Selection-aware markdown insertion.

use super::selection::Selection;
use crate::text::{char_len, char_to_byte, slice_chars};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Result of splicing text into a buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insertion {
    pub buffer: String,
    /// Collapsed caret position (char index) to restore after the edit.
    pub cursor: usize,
}

/// Wrap the selected text in `prefix`/`suffix`.
///
/// The caret lands right after the re-inserted selection, before `suffix`, so
/// an empty selection leaves the caret between the markers.
///
/// Selection ends past the buffer are clamped.
pub fn insert(buffer: &str, selection: Selection, prefix: &str, suffix: &str) -> Insertion {
    let selection = selection.clamp(char_len(buffer));
    let selected = slice_chars(buffer, selection.start, selection.end);
    let start_byte = char_to_byte(buffer, selection.start);
    let end_byte = start_byte + selected.len();

    let mut out = String::with_capacity(buffer.len() + prefix.len() + suffix.len());
    out.push_str(&buffer[..start_byte]);
    out.push_str(prefix);
    out.push_str(selected);
    out.push_str(suffix);
    out.push_str(&buffer[end_byte..]);

    Insertion {
        buffer: out,
        cursor: selection.start + char_len(prefix) + selection.len(),
    }
}

/// Replace the selection with `text`, leaving the caret after it.
pub fn insert_text(buffer: &str, selection: Selection, text: &str) -> Insertion {
    let selection = selection.clamp(char_len(buffer));
    let start_byte = char_to_byte(buffer, selection.start);
    let end_byte = char_to_byte(buffer, selection.end);

    let mut out = String::with_capacity(buffer.len() + text.len());
    out.push_str(&buffer[..start_byte]);
    out.push_str(text);
    out.push_str(&buffer[end_byte..]);

    Insertion {
        buffer: out,
        cursor: selection.start + char_len(text),
    }
}

/// Formatting actions offered by the toolbar and keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkdownFormat {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    InlineCode,
    Link,
    Heading1,
    Heading,
    Heading3,
    Quote,
    CodeBlock,
    BulletList,
    NumberedList,
    TaskItem,
    Image,
    HorizontalRule,
    YouTube,
}

impl MarkdownFormat {
    /// Every action in toolbar order.
    pub const ALL: [MarkdownFormat; 17] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strikethrough,
        Self::InlineCode,
        Self::Link,
        Self::Heading1,
        Self::Heading,
        Self::Heading3,
        Self::Quote,
        Self::CodeBlock,
        Self::BulletList,
        Self::NumberedList,
        Self::TaskItem,
        Self::Image,
        Self::HorizontalRule,
        Self::YouTube,
    ];

    /// `(prefix, suffix)` wrapped around the selection.
    pub fn markers(self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("**", "**"),
            Self::Italic => ("*", "*"),
            Self::Underline => ("<u>", "</u>"),
            Self::Strikethrough => ("~~", "~~"),
            Self::InlineCode => ("`", "`"),
            Self::Link => ("[", "](url)"),
            Self::Heading1 => ("# ", ""),
            Self::Heading => ("## ", ""),
            Self::Heading3 => ("### ", ""),
            Self::Quote => ("> ", ""),
            Self::CodeBlock => ("```\n", "\n```"),
            Self::BulletList => ("- ", ""),
            Self::NumberedList => ("1. ", ""),
            Self::TaskItem => ("- [ ] ", ""),
            Self::Image => ("![", "](url)"),
            Self::HorizontalRule => ("\n---\n", ""),
            Self::YouTube => ("@[youtube](", ")"),
        }
    }

    /// Stable machine name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strikethrough => "strikethrough",
            Self::InlineCode => "inline-code",
            Self::Link => "link",
            Self::Heading1 => "heading1",
            Self::Heading => "heading",
            Self::Heading3 => "heading3",
            Self::Quote => "quote",
            Self::CodeBlock => "code-block",
            Self::BulletList => "bullet-list",
            Self::NumberedList => "numbered-list",
            Self::TaskItem => "task-item",
            Self::Image => "image",
            Self::HorizontalRule => "horizontal-rule",
            Self::YouTube => "youtube",
        }
    }

    /// Toolbar tooltip text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Underline => "Underline",
            Self::Strikethrough => "Strikethrough",
            Self::InlineCode => "Inline code",
            Self::Link => "Link",
            Self::Heading1 => "Heading 1",
            Self::Heading => "Heading 2",
            Self::Heading3 => "Heading 3",
            Self::Quote => "Quote",
            Self::CodeBlock => "Code block",
            Self::BulletList => "Bulleted list",
            Self::NumberedList => "Numbered list",
            Self::TaskItem => "Task",
            Self::Image => "Image",
            Self::HorizontalRule => "Divider",
            Self::YouTube => "YouTube video",
        }
    }

    /// Apply this action to `buffer` at `selection`.
    pub fn apply(self, buffer: &str, selection: Selection) -> Insertion {
        let (prefix, suffix) = self.markers();
        insert(buffer, selection, prefix, suffix)
    }
}

impl fmt::Display for MarkdownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkdownFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|format| format.name() == normalized)
            .ok_or_else(|| format!("unknown format '{}'", value))
    }
}
