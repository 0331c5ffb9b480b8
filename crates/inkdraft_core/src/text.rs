//! Char/byte offset helpers.
//!
//! Editor offsets are char (Unicode scalar) indices; Rust strings are sliced by
//! byte, so every splice goes through these conversions.

/// Returns the number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a char index into a byte index, clamping past-the-end indices to
/// `text.len()`.
pub fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Returns the chars in `start..end` as a borrowed slice.
///
/// Both ends are clamped to the text length; a reversed range yields `""`.
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(text, start);
    let end_byte = char_to_byte(text, end);
    if start_byte >= end_byte {
        return "";
    }
    &text[start_byte..end_byte]
}
