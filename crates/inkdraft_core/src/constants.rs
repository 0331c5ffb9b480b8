//! Shared constants used across inkdraft crates.

/// Quiet period before a dirty draft is persisted, in milliseconds.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1_500;

/// Maximum number of snapshots kept by the undo history.
pub const DEFAULT_HISTORY_LIMIT: usize = 500;

/// Draft location used when `INKDRAFT_DRAFT_PATH` is unset.
pub const DEFAULT_DRAFT_RELATIVE_PATH: &str = ".cache/inkdraft/draft.md";

/// Anchor used for headings whose text produces an empty slug.
pub const EMPTY_HEADING_SLUG: &str = "section";

/// Embed host used when expanding video markers into players.
pub const YOUTUBE_EMBED_BASE_URL: &str = "https://www.youtube-nocookie.com/embed/";
