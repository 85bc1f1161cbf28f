//! Context keyword scoring
//!
//! A candidate span is more credible when a related keyword ("SSN:",
//! "Telefon", "código postal") appears nearby. The scorer searches a bounded
//! window on each side of the span, case-insensitively and with word-boundary
//! semantics so that `ssn` never matches inside `assignment`.

use crate::text::slice_chars;

/// Default search window, in characters, on each side of a span.
pub const DEFAULT_CONTEXT_WINDOW: usize = 100;

/// Check whether any of `keywords` appears within `window` characters before
/// `start` or after `end` (both character offsets, clamped to text edges).
///
/// Matching is case-insensitive. A keyword only counts when it stands on its
/// own word boundaries: the characters adjacent to the occurrence must not be
/// alphanumeric. Pure function, returns true on first match.
pub fn has_context(
    text: &str,
    start: usize,
    end: usize,
    keywords: &[String],
    window: usize,
) -> bool {
    if keywords.is_empty() {
        return false;
    }

    let len = crate::text::char_len(text);
    let start = start.min(len);
    let end = end.min(len);

    let before = slice_chars(text, start.saturating_sub(window), start).to_lowercase();
    let after = slice_chars(text, end, (end + window).min(len)).to_lowercase();

    keywords.iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        contains_word(&before, &keyword) || contains_word(&after, &keyword)
    })
}

/// Substring search with word-boundary checks on both edges.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut search_from = 0;
    while let Some(rel) = haystack[search_from..].find(needle) {
        let pos = search_from + rel;
        let before_ok = haystack[..pos]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[pos + needle.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        search_from = pos + needle.len();
    }
    false
}
