//! Heading anchors and table-of-contents extraction.

use crate::constants::EMPTY_HEADING_SLUG;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Heading entry for a table of contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Derive an anchor slug from heading text.
///
/// Lower-cases, turns whitespace runs into `-`, then drops anything that is
/// not alphanumeric, `_` or `-`. Identical text always yields the same slug;
/// use [`HeadingIds`] when repeats must stay distinct.
pub fn heading_slug(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_alphanumeric() || ch == '_' || ch == '-' {
            slug.push(ch);
        }
    }
    slug
}

/// Per-document anchor allocator.
///
/// Repeated slugs get `-1`, `-2`, ... appended; empty slugs become `section`.
#[derive(Debug, Default)]
pub struct HeadingIds {
    next_suffix: HashMap<String, usize>,
    used: HashSet<String>,
}

impl HeadingIds {
    /// Allocate a unique id for `text`.
    pub fn assign(&mut self, text: &str) -> String {
        let mut base = heading_slug(text);
        if base.is_empty() {
            base = EMPTY_HEADING_SLUG.to_string();
        }
        let mut suffix = self.next_suffix.get(&base).copied().unwrap_or(0);
        let mut id = if suffix == 0 {
            base.clone()
        } else {
            format!("{}-{}", base, suffix)
        };
        while self.used.contains(&id) {
            suffix += 1;
            id = format!("{}-{}", base, suffix);
        }
        self.next_suffix.insert(base, suffix + 1);
        self.used.insert(id.clone());
        id
    }
}

pub(crate) fn heading_level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Concatenate the visible text of inline events.
pub(crate) fn plain_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(value) | Event::Code(value) => text.push_str(value),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// List every heading in document order with its anchor id.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut ids = HeadingIds::default();
    let mut headings = Vec::new();
    let mut current: Option<(HeadingLevel, Vec<Event<'_>>)> = None;
    for event in Parser::new_ext(markdown, super::markdown_options()) {
        match event {
            Event::Start(Tag::Heading(level, _, _)) => current = Some((level, Vec::new())),
            Event::End(Tag::Heading(..)) => {
                if let Some((level, inner)) = current.take() {
                    let text = plain_text(&inner).trim().to_string();
                    let id = ids.assign(&text);
                    headings.push(Heading {
                        level: heading_level_number(level),
                        text,
                        id,
                    });
                }
            }
            other => {
                if let Some((_, inner)) = current.as_mut() {
                    inner.push(other);
                }
            }
        }
    }
    headings
}
