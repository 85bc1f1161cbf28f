//! Semantic unit detection
//!
//! Runs the pattern catalog over raw text and produces scored candidate
//! spans: complete semantic units (a whole date, a whole SSN) as opposed to
//! the fragmentary token predictions an external model emits. Scoring
//! combines the pattern base score, a context-keyword boost, and a heavy
//! penalty when a structural validator rejects the match.

use crate::detection::context::{has_context, DEFAULT_CONTEXT_WINDOW};
use crate::patterns::PiiPattern;
use crate::text::byte_to_char;
use tracing::{debug, warn};

/// Multiplier applied when a structural validator rejects the match.
/// The candidate survives with a heavily reduced score rather than being
/// dropped outright.
const VALIDATION_PENALTY: f32 = 0.3;

/// A scored candidate span produced by one pattern.
///
/// Offsets are character offsets into the scanned text. Units are immutable
/// after creation and discarded after fusion.
#[derive(Debug, Clone)]
pub struct SemanticUnit<'p> {
    /// Character start offset
    pub start: usize,
    /// Character end offset (exclusive)
    pub end: usize,
    /// Entity type tag from the producing pattern
    pub entity_type: String,
    /// Computed confidence score
    pub score: f32,
    /// The pattern that produced this unit
    pub pattern: &'p PiiPattern,
}

impl SemanticUnit<'_> {
    fn overlaps(&self, other: &SemanticUnit<'_>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Scan `text` with every pattern and return non-overlapping scored units,
/// sorted by start offset.
///
/// Overlaps between matches from different patterns are resolved purely
/// positionally: higher priority wins, ties broken by higher score.
pub fn find_semantic_units<'p>(text: &str, patterns: &'p [PiiPattern]) -> Vec<SemanticUnit<'p>> {
    let mut candidates: Vec<SemanticUnit<'p>> = Vec::new();

    for pattern in patterns {
        for matched in pattern.regex.find_iter(text) {
            let matched = match matched {
                Ok(m) => m,
                Err(e) => {
                    // Backtracking limits are a property of the input, not a
                    // caller error; skip the pattern for this text.
                    warn!(pattern = %pattern.name, error = %e, "regex scan failed");
                    break;
                }
            };
            let start = byte_to_char(text, matched.start());
            let end = byte_to_char(text, matched.end());

            let mut score = pattern.base_score;
            if has_context(text, start, end, &pattern.context_words, DEFAULT_CONTEXT_WINDOW) {
                score += pattern.context_boost;
            }
            if let Some(validator) = pattern.validator {
                if !validator.validate(matched.as_str()) {
                    score *= VALIDATION_PENALTY;
                }
            }

            candidates.push(SemanticUnit {
                start,
                end,
                entity_type: pattern.entity_type.clone(),
                score: score.clamp(0.0, 1.0),
                pattern,
            });
        }
    }

    resolve_overlaps(candidates)
}

/// Keep the best unit wherever two or more overlap: higher priority first,
/// then higher score. Resolution is positional, not type-aware.
fn resolve_overlaps(mut candidates: Vec<SemanticUnit<'_>>) -> Vec<SemanticUnit<'_>> {
    candidates.sort_by(|a, b| {
        b.pattern
            .priority
            .cmp(&a.pattern.priority)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.start.cmp(&b.start))
    });

    let mut kept: Vec<SemanticUnit<'_>> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.iter().any(|k| k.overlaps(&candidate)) {
            debug!(
                entity_type = %candidate.entity_type,
                start = candidate.start,
                end = candidate.end,
                "dropping overlapped candidate"
            );
            continue;
        }
        kept.push(candidate);
    }

    kept.sort_by_key(|u| u.start);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;
    use crate::patterns::PatternRegistry;
    use crate::text::slice_chars;

    fn english() -> PatternRegistry {
        PatternRegistry::for_language(Language::English).unwrap()
    }

    #[test]
    fn test_ssn_with_context_scores_high() {
        let registry = english();
        let text = "Patient SSN: 123-45-6789";
        let units = find_semantic_units(text, registry.patterns());
        let ssn = units.iter().find(|u| u.entity_type == "ssn").unwrap();
        assert_eq!(slice_chars(text, ssn.start, ssn.end), "123-45-6789");
        // base 0.3 + context boost 0.55
        assert!(ssn.score >= 0.8);
    }

    #[test]
    fn test_ssn_without_context_scores_base() {
        let registry = english();
        let text = "The number is 123-45-6789";
        let units = find_semantic_units(text, registry.patterns());
        let ssn = units.iter().find(|u| u.entity_type == "ssn").unwrap();
        assert!((0.25..=0.35).contains(&ssn.score));
    }

    #[test]
    fn test_invalid_ssn_penalized_despite_context() {
        let registry = english();
        let text = "Patient SSN: 666-45-6789";
        let units = find_semantic_units(text, registry.patterns());
        let ssn = units.iter().find(|u| u.entity_type == "ssn").unwrap();
        // (0.3 + 0.55) * 0.3
        assert!(ssn.score < 0.3);
    }

    #[test]
    fn test_npi_beats_phone_for_ten_digits() {
        let registry = english();
        let text = "Provider NPI: 1234567893";
        let units = find_semantic_units(text, registry.patterns());
        let ten_digit: Vec<_> = units
            .iter()
            .filter(|u| slice_chars(text, u.start, u.end) == "1234567893")
            .collect();
        assert_eq!(ten_digit.len(), 1);
        assert_eq!(ten_digit[0].entity_type, "npi");
        assert!(ten_digit[0].score >= 0.7);
    }

    #[test]
    fn test_formatted_phone_with_context() {
        let registry = english();
        let text = "Contact phone: 555-123-4567";
        let units = find_semantic_units(text, registry.patterns());
        let phone = units
            .iter()
            .find(|u| u.entity_type == "phone_number")
            .unwrap();
        assert_eq!(slice_chars(text, phone.start, phone.end), "555-123-4567");
        // base 0.4 + context boost 0.35, valid NANP number
        assert!(phone.score >= 0.7);
    }

    #[test]
    fn test_units_sorted_by_start() {
        let registry = english();
        let text = "DOB: 01/15/1970, Email: john@example.com, SSN: 123-45-6789";
        let units = find_semantic_units(text, registry.patterns());
        assert!(units.windows(2).all(|w| w[0].start <= w[1].start));
        assert!(units.iter().any(|u| u.entity_type == "date"));
        assert!(units.iter().any(|u| u.entity_type == "email"));
        assert!(units.iter().any(|u| u.entity_type == "ssn"));
    }

    #[test]
    fn test_no_overlapping_units_returned() {
        let registry = english();
        let text = "Provider NPI: 1234567893, MRN: MRN123456789, call 5551234567";
        let units = find_semantic_units(text, registry.patterns());
        for pair in units.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_french_nir_detected_with_offsets_in_chars() {
        let registry = PatternRegistry::for_language(Language::French).unwrap();
        // Leading accented text shifts byte offsets away from char offsets
        let text = "Numéro de sécurité: 1 00 00 00 000 000 47";
        let units = find_semantic_units(text, registry.patterns());
        let nir = units.iter().find(|u| u.entity_type == "national_id").unwrap();
        assert_eq!(slice_chars(text, nir.start, nir.end), "1 00 00 00 000 000 47");
        assert!(nir.score > 0.8); // context + valid checksum
    }

    #[test]
    fn test_empty_text() {
        let registry = english();
        assert!(find_semantic_units("", registry.patterns()).is_empty());
    }
}
