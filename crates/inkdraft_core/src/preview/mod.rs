//! Markdown preview pipeline.

pub mod embed;
pub mod headings;
pub mod render;

pub use embed::{embed_marker, transform, youtube_video_id};
pub use headings::{extract_headings, heading_slug, Heading, HeadingIds};
pub use render::{render_html, render_html_with, RenderOptions};

use pulldown_cmark::Options;

/// Markdown extensions enabled for preview and table-of-contents parsing.
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}
