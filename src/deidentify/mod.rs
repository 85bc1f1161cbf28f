//! De-identification engine
//!
//! Takes the fused entity list and rewrites the input text according to a
//! redaction method. Replacement happens right to left so earlier splices
//! never invalidate the character offsets of entities still to process. A
//! single entity failing to redact (an unparseable date) degrades to a
//! placeholder; it never aborts the call.

pub mod dates;
pub mod fake;
pub mod normalize;

use crate::domain::{DeidentificationResult, FusedEntity, Language, PiiEntity, Result};
use crate::fusion::normalize_label;
use crate::text::splice_chars;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::info;

/// Redaction strategy applied to every detected entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeidentifyMethod {
    /// Replace with a `[TYPE]` placeholder
    Mask,
    /// Delete the entity text entirely
    Remove,
    /// Replace with locale-appropriate fake data
    Replace,
    /// Replace with `TYPE_<hash>` for consistent entity linking
    Hash,
    /// Shift dates by a per-call offset; non-dates are masked
    ShiftDates,
}

impl DeidentifyMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mask => "mask",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Hash => "hash",
            Self::ShiftDates => "shift_dates",
        }
    }
}

/// Options shared by every redaction method.
#[derive(Debug, Clone)]
pub struct DeidentifyOptions {
    /// Keep the year unchanged when shifting dates
    pub keep_year: bool,
    /// Explicit day offset for `shift_dates`; random in ±365 when absent
    pub date_shift_days: Option<i64>,
    /// Record a replacement-token to original-text mapping
    pub keep_mapping: bool,
    /// Seed for the replacement RNG; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for DeidentifyOptions {
    fn default() -> Self {
        Self {
            keep_year: true,
            date_shift_days: None,
            keep_mapping: false,
            seed: None,
        }
    }
}

/// Apply `method` to every entity in `text`.
///
/// Entities must carry character offsets into `text`, as produced by fusion.
/// One shift offset is drawn per call, so intervals between dates in the
/// same document are preserved. When `keep_mapping` is set, the mapping
/// records the first occurrence of each replacement token in text order.
pub fn deidentify(
    text: &str,
    entities: &[FusedEntity],
    method: DeidentifyMethod,
    options: &DeidentifyOptions,
    language: Language,
) -> Result<DeidentificationResult> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let shift_days = match method {
        DeidentifyMethod::ShiftDates => Some(
            options
                .date_shift_days
                .unwrap_or_else(|| rng.gen_range(-365..=365)),
        ),
        _ => None,
    };

    let mut pii_entities: Vec<PiiEntity> = entities.iter().map(PiiEntity::from).collect();
    // Right-to-left splicing keeps remaining offsets valid.
    pii_entities.sort_by(|a, b| b.start.cmp(&a.start));

    let mut deidentified = text.to_string();
    let mut mapping: Option<HashMap<String, String>> =
        options.keep_mapping.then(HashMap::new);

    for entity in &mut pii_entities {
        let redacted = redact_entity(entity, method, options.keep_year, shift_days, language, &mut rng);
        deidentified = splice_chars(&deidentified, entity.start, entity.end, &redacted);
        if let Some(map) = mapping.as_mut() {
            // Iteration is descending by start, so the earliest occurrence
            // of a repeated token wins.
            map.insert(redacted.clone(), entity.text.clone());
        }
        entity.redacted_text = Some(redacted);
    }

    info!(
        method = method.as_str(),
        language = %language,
        entities = pii_entities.len(),
        "de-identification complete"
    );

    Ok(DeidentificationResult {
        original_text: text.to_string(),
        deidentified_text: deidentified,
        pii_entities,
        method: method.as_str().to_string(),
        timestamp: Utc::now(),
        mapping,
    })
}

fn redact_entity(
    entity: &mut PiiEntity,
    method: DeidentifyMethod,
    keep_year: bool,
    shift_days: Option<i64>,
    language: Language,
    rng: &mut StdRng,
) -> String {
    match method {
        DeidentifyMethod::Mask => format!("[{}]", entity.entity_type),
        DeidentifyMethod::Remove => String::new(),
        DeidentifyMethod::Replace => fake::fake_value(&entity.entity_type, language, rng),
        DeidentifyMethod::Hash => {
            let digest = Sha256::digest(entity.text.as_bytes());
            let hash = hex_prefix(&digest, 8);
            entity.hash_value = Some(hash.clone());
            format!("{}_{hash}", entity.entity_type)
        }
        DeidentifyMethod::ShiftDates => {
            let is_date = normalize_label(&entity.entity_type) == "date";
            match (is_date, shift_days) {
                (true, Some(days)) => dates::shift_date(&entity.text, days, keep_year, language),
                _ => format!("[{}]", entity.entity_type),
            }
        }
    }
}

fn hex_prefix(digest: &[u8], len: usize) -> String {
    let mut out = String::with_capacity(len);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
        if out.len() >= len {
            break;
        }
    }
    out.truncate(len);
    out
}

/// Restore the original text from a de-identified copy and its mapping.
///
/// Pure literal substitution; exact restoration requires that every
/// replacement token was unique in the de-identified text.
pub fn reidentify(deidentified_text: &str, mapping: &HashMap<String, String>) -> String {
    let mut text = deidentified_text.to_string();
    for (token, original) in mapping {
        if !token.is_empty() {
            text = text.replace(token, original);
        }
    }
    text
}
