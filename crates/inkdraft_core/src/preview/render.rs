//! Markdown-to-HTML rendering with heading anchors and video players.

use super::embed::{re_marker, transform};
use super::headings::{heading_level_number, plain_text, HeadingIds};
use crate::constants::YOUTUBE_EMBED_BASE_URL;
use pulldown_cmark::{html, Event, HeadingLevel, Parser, Tag};
use regex::Captures;
use std::borrow::Cow;

/// Rendering switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Replace video markers with players; markers are kept verbatim otherwise.
    pub expand_embeds: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            expand_embeds: true,
        }
    }
}

/// Render markdown to HTML with default options.
pub fn render_html(markdown: &str) -> String {
    render_html_with(markdown, RenderOptions::default())
}

/// Render markdown to HTML.
///
/// Runs [`transform`] first, writes every heading with a unique `id`, then
/// optionally swaps video markers for players.
pub fn render_html_with(markdown: &str, options: RenderOptions) -> String {
    let transformed = transform(markdown);
    let mut ids = HeadingIds::default();
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut heading: Option<(HeadingLevel, Vec<Event<'_>>)> = None;

    for event in Parser::new_ext(&transformed, super::markdown_options()) {
        match event {
            Event::Start(Tag::Heading(level, _, _)) => heading = Some((level, Vec::new())),
            Event::End(Tag::Heading(..)) => {
                if let Some((level, inner)) = heading.take() {
                    let id = ids.assign(plain_text(&inner).trim());
                    let level = heading_level_number(level);
                    events.push(Event::Html(format!("<h{} id=\"{}\">", level, id).into()));
                    events.extend(inner);
                    events.push(Event::Html(format!("</h{}>\n", level).into()));
                }
            }
            other => match heading.as_mut() {
                Some((_, inner)) => inner.push(other),
                None => events.push(other),
            },
        }
    }

    let mut out = String::with_capacity(transformed.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());

    if options.expand_embeds {
        expand_embeds(&out).into_owned()
    } else {
        out
    }
}

fn player_html(video_id: &str) -> String {
    format!(
        concat!(
            r#"<div class="video-embed" data-provider="youtube">"#,
            r#"<iframe src="{}{}" title="YouTube video player" loading="lazy" "#,
            r#"allow="accelerometer; clipboard-write; encrypted-media; gyroscope; picture-in-picture" "#,
            r#"allowfullscreen></iframe></div>"#
        ),
        YOUTUBE_EMBED_BASE_URL, video_id
    )
}

/// Swap markers that carry a video id for an embedded player.
pub fn expand_embeds(html: &str) -> Cow<'_, str> {
    re_marker().replace_all(html, |caps: &Captures<'_>| match caps.get(2) {
        Some(id) => player_html(id.as_str()),
        None => caps[0].to_string(),
    })
}
