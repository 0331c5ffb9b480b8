//! Rewrites inline video shorthand into embed markers.
//!
//! `@[youtube](URL)` becomes
//! `<div class="video-embed" data-provider="youtube" data-url="URL"></div>`.
//! URLs cannot contain whitespace, brackets, parentheses, quotes or angle
//! brackets, so a rewritten marker never contains the shorthand again.

use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::OnceLock;

fn re_shorthand() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"@\[youtube\]\(([^\s()\[\]<>"]+)\)"#).expect("valid shorthand regex")
    })
}

fn re_video_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:https?://)?(?:www\.|m\.)?(?:youtu\.be/|youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|live/))([A-Za-z0-9_-]{6,})",
        )
        .expect("valid video id regex")
    })
}

pub(crate) fn re_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"<div class="video-embed" data-provider="youtube" data-url="([^"]*)"(?: data-video-id="([A-Za-z0-9_-]+)")?></div>"#,
        )
        .expect("valid marker regex")
    })
}

/// Extract the YouTube video id from a watch, short, embed or shorts URL.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    re_video_id()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str())
}

fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Build the embed marker for `url`.
pub fn embed_marker(url: &str) -> String {
    let mut marker = format!(
        r#"<div class="video-embed" data-provider="youtube" data-url="{}""#,
        escape_attr(url)
    );
    if let Some(id) = youtube_video_id(url) {
        marker.push_str(&format!(r#" data-video-id="{}""#, id));
    }
    marker.push_str("></div>");
    marker
}

/// Byte ranges of fenced or indented code blocks and inline code spans.
fn code_ranges(buffer: &str) -> Vec<Range<usize>> {
    Parser::new_ext(buffer, super::markdown_options())
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect()
}

fn in_code(code: &[Range<usize>], span: &Range<usize>) -> bool {
    code.iter()
        .any(|range| range.start < span.end && span.start < range.end)
}

fn at_line_start(out: &str) -> bool {
    let line_start = out.rfind('\n').map_or(0, |index| index + 1);
    out[line_start..].trim().is_empty()
}

/// Close the HTML block opened by a marker at the start of a line.
///
/// Text after the marker moves to its own paragraph, and a blank line is
/// inserted before a following non-blank line.
///
/// # Returns
/// The byte offset in `buffer` where copying resumes.
fn close_marker_block(buffer: &str, pos: usize, out: &mut String) -> usize {
    let rest = &buffer[pos..];
    let line_len = rest.find('\n').unwrap_or(rest.len());
    let tail = &rest[..line_len];
    if !tail.trim().is_empty() {
        out.push_str("\n\n");
        return pos + (tail.len() - tail.trim_start().len());
    }

    let line_end = (pos + line_len + 1).min(buffer.len());
    out.push_str(&buffer[pos..line_end]);
    let next_line = buffer[line_end..].split('\n').next().unwrap_or("");
    if line_end < buffer.len() && !next_line.trim().is_empty() {
        out.push('\n');
    }
    line_end
}

/// Rewrite every video shorthand outside code into a marker.
///
/// Code regions follow CommonMark: fenced and indented blocks and inline code
/// spans keep the shorthand verbatim. A marker that starts a line is followed
/// by a blank line so the next line still renders as markdown.
///
/// Returns the input unchanged (borrowed) when nothing was rewritten.
/// Applying the transform to its own output is a no-op.
pub fn transform(buffer: &str) -> Cow<'_, str> {
    if !re_shorthand().is_match(buffer) {
        return Cow::Borrowed(buffer);
    }

    let code = code_ranges(buffer);
    let mut out = String::with_capacity(buffer.len() + 64);
    let mut copied = 0;
    let mut rewrote = false;
    for caps in re_shorthand().captures_iter(buffer) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() < copied || in_code(&code, &whole.range()) {
            continue;
        }
        out.push_str(&buffer[copied..whole.start()]);
        let block = at_line_start(&out);
        out.push_str(&embed_marker(&caps[1]));
        copied = whole.end();
        if block {
            copied = close_marker_block(buffer, copied, &mut out);
        }
        rewrote = true;
    }

    if !rewrote {
        return Cow::Borrowed(buffer);
    }
    out.push_str(&buffer[copied..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_shorthand_with_video_id() {
        let out = transform("Watch @[youtube](https://youtu.be/dQw4w9WgXcQ) now");
        assert_eq!(
            out,
            r#"Watch <div class="video-embed" data-provider="youtube" data-url="https://youtu.be/dQw4w9WgXcQ" data-video-id="dQw4w9WgXcQ"></div> now"#
        );
    }

    #[test]
    fn rewrites_every_occurrence() {
        let input = "@[youtube](https://www.youtube.com/watch?v=abcdef1)\n\n@[youtube](https://example.com/clip)\n";
        let out = transform(input);
        assert_eq!(out.matches("video-embed").count(), 2);
        assert!(out.contains(r#"data-video-id="abcdef1""#));
        assert!(out.contains(r#"data-url="https://example.com/clip"></div>"#));
    }

    #[test]
    fn non_matching_input_is_borrowed_unchanged() {
        let input = "# Title\n\nSome [link](https://youtu.be/abc) and @[vimeo](x).";
        let out = transform(input);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, input);
    }

    #[test]
    fn transform_is_idempotent() {
        let inputs = [
            "@[youtube](https://youtu.be/dQw4w9WgXcQ)",
            "a @[youtube](https://youtu.be/x1y2z3a4)@[youtube](https://youtu.be/q9w8e7r6) b",
            "@[youtube](http://a/@[youtube](http://b)x)",
            "```\n@[youtube](https://youtu.be/inside1)\n```\n@[youtube](https://youtu.be/outside1)",
            "@[youtube](https://youtu.be/dQw4w9WgXcQ)\ntext right after\n",
            "`@[youtube](https://youtu.be/inline11)` and @[youtube](https://youtu.be/after11) tail",
            "plain text",
        ];
        for input in inputs {
            let once = transform(input).into_owned();
            let twice = transform(&once).into_owned();
            assert_eq!(once, twice, "input: {:?}", input);
        }
    }

    #[test]
    fn fenced_code_is_left_alone() {
        let input = "~~~\n@[youtube](https://youtu.be/inside1)\n~~~\n@[youtube](https://youtu.be/outside1)\n";
        let out = transform(input);
        assert!(out.contains("@[youtube](https://youtu.be/inside1)"));
        assert!(!out.contains("@[youtube](https://youtu.be/outside1)"));
    }

    #[test]
    fn info_string_line_does_not_close_open_fence() {
        let input = "```\n```rust\n@[youtube](https://youtu.be/dQw4w9WgXcQ)\n```\n";
        let out = transform(input);
        assert!(matches!(out, Cow::Borrowed(_)), "{}", out);
    }

    #[test]
    fn shorter_fence_inside_longer_fence_stays_code() {
        let input = "````\n```\n@[youtube](https://youtu.be/dQw4w9WgXcQ)\n````\n";
        assert_eq!(transform(input), input);

        let html = super::super::render_html(input);
        assert!(html.contains("@[youtube](https://youtu.be/dQw4w9WgXcQ)"), "{}", html);
        assert!(!html.contains("video-embed"), "{}", html);
    }

    #[test]
    fn indented_code_and_code_spans_keep_shorthand() {
        let input = "Use `@[youtube](https://youtu.be/dQw4w9WgXcQ)` syntax\n\n    @[youtube](https://youtu.be/abcdef1)\n";
        assert_eq!(transform(input), input);

        let mixed = "`@[youtube](https://youtu.be/abcdef1)` then @[youtube](https://youtu.be/dQw4w9WgXcQ)";
        let out = transform(mixed);
        assert!(out.starts_with("`@[youtube](https://youtu.be/abcdef1)` then <div"));
        assert_eq!(out.matches("video-embed").count(), 1);
    }

    #[test]
    fn standalone_marker_is_followed_by_blank_line() {
        let out = transform("@[youtube](https://youtu.be/dQw4w9WgXcQ)\nSome **bold** text\n");
        assert!(out.ends_with("></div>\n\nSome **bold** text\n"), "{}", out);

        let spaced = "@[youtube](https://youtu.be/dQw4w9WgXcQ)\n\nNext\n";
        assert!(transform(spaced).ends_with("></div>\n\nNext\n"));
    }

    #[test]
    fn text_after_line_leading_marker_moves_to_own_paragraph() {
        let out = transform("@[youtube](https://youtu.be/dQw4w9WgXcQ)   and more\n");
        assert!(out.ends_with("></div>\n\nand more\n"), "{}", out);
    }

    #[test]
    fn headings_survive_transform() {
        let input = "## Demo\n@[youtube](https://youtu.be/dQw4w9WgXcQ)\n### Next";
        let out = transform(input);
        assert!(out.starts_with("## Demo\n"));
        assert!(out.ends_with("\n### Next"));
    }

    #[test]
    fn extracts_video_ids_from_known_url_shapes() {
        assert_eq!(youtube_video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            youtube_video_id("https://youtube.com/embed/dQw4w9WgXcQ?start=4"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            youtube_video_id("https://m.youtube.com/shorts/abcDEF_123"),
            Some("abcDEF_123")
        );
        assert_eq!(youtube_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
    }

    #[test]
    fn marker_escapes_attribute_characters() {
        let marker = embed_marker("https://example.com/?a=1&b=2");
        assert!(marker.contains(r#"data-url="https://example.com/?a=1&amp;b=2""#));
        assert!(!marker.contains("data-video-id"));
    }
}
