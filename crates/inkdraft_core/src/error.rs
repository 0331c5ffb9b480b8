//! Error types for persistence and input parsing.
use thiserror::Error;

/// Top-level error type for the editing core.
///
/// Editing operations themselves are total; errors only arise at the
/// persistence boundary and when parsing user-supplied key chords.
#[derive(Error, Debug)]
pub enum DraftError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Save worker unavailable")]
    WorkerUnavailable,

    #[error("Invalid key chord: {0}")]
    InvalidChord(String),
}
