//! Offset-stable text utilities
//!
//! The public API of this crate works in character offsets so that spans
//! computed on accent-normalized text remain valid against the original
//! accented text. Regex engines report byte offsets, so these helpers convert
//! between the two and splice replacements without invalidating later offsets.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `char_idx`-th character, clamped to the end of `text`.
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Character index of the character starting at `byte_idx`.
///
/// `byte_idx` must lie on a character boundary; offsets reported by the regex
/// engines always do.
pub fn byte_to_char(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

/// Slice `text` by character offsets.
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let b_start = char_to_byte(text, start);
    let b_end = char_to_byte(text, end);
    &text[b_start..b_end]
}

/// Replace the character range `[start, end)` of `text` with `replacement`.
///
/// An inverted range is treated as empty at `start`, so malformed caller
/// spans insert rather than panic.
pub fn splice_chars(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let b_start = char_to_byte(text, start);
    let b_end = char_to_byte(text, end.max(start)).max(b_start);
    let mut out = String::with_capacity(text.len() - (b_end - b_start) + replacement.len());
    out.push_str(&text[..b_start]);
    out.push_str(replacement);
    out.push_str(&text[b_end..]);
    out
}
