//! Entity data models
//!
//! Each stage of the pipeline has its own closed struct type: model fragments
//! come in from the external token classifier, fused entities come out of the
//! fusion engine, and PII entities carry replacement metadata through
//! de-identification. All offsets are character offsets into the original
//! input text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A token-level prediction from the external model.
///
/// Tokenization can split one semantic unit into several adjacent or
/// overlapping fragments; the fusion engine reassembles them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFragment {
    /// Character start offset
    pub start: usize,
    /// Character end offset (exclusive)
    pub end: usize,
    /// Raw label emitted by the model
    pub entity_type: String,
    /// Model confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Surface text of the fragment
    pub text: String,
}

impl ModelFragment {
    pub fn new(
        start: usize,
        end: usize,
        entity_type: impl Into<String>,
        confidence: f32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            entity_type: entity_type.into(),
            confidence,
            text: text.into(),
        }
    }
}

/// A complete entity after fusing model fragments with semantic units.
///
/// This is the unit handed to the de-identification engine. Spans from one
/// fusion pass never overlap each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedEntity {
    /// Character start offset
    pub start: usize,
    /// Character end offset (exclusive)
    pub end: usize,
    /// Resolved entity type (most specific of model and pattern labels)
    pub entity_type: String,
    /// Fused confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Surface text covered by the fused span
    pub text: String,
    /// How this entity was derived
    pub source: FusionSource,
}

/// Provenance of a fused entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionSource {
    /// Model cluster only, no matching semantic unit
    Model,
    /// Semantic unit only, the model missed it
    Pattern,
    /// Model cluster fused with an overlapping semantic unit
    Fused,
}

/// A fused entity augmented with redaction metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiEntity {
    /// Surface text before redaction
    pub text: String,
    /// Entity type used for placeholder and fake-data lookup
    pub entity_type: String,
    /// Character start offset
    pub start: usize,
    /// Character end offset (exclusive)
    pub end: usize,
    /// Confidence score carried over from fusion
    pub confidence: f32,
    /// Replacement text chosen by the selected method
    pub redacted_text: Option<String>,
    /// Computed hash value (hash method only)
    pub hash_value: Option<String>,
}

impl From<&FusedEntity> for PiiEntity {
    fn from(entity: &FusedEntity) -> Self {
        Self {
            text: entity.text.clone(),
            entity_type: entity.entity_type.clone(),
            start: entity.start,
            end: entity.end,
            confidence: entity.confidence,
            redacted_text: None,
            hash_value: None,
        }
    }
}

/// Result of a de-identification call.
///
/// When `mapping` is present, re-applying it to `deidentified_text` via
/// literal substitution reproduces `original_text` exactly, provided every
/// replacement token is unique in the transformed text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeidentificationResult {
    /// Input text before de-identification
    pub original_text: String,
    /// Output text with PII redacted
    pub deidentified_text: String,
    /// Detected and redacted PII entities
    pub pii_entities: Vec<PiiEntity>,
    /// De-identification method used
    pub method: String,
    /// When de-identification was performed
    pub timestamp: DateTime<Utc>,
    /// Optional mapping from replacement token to original surface text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<HashMap<String, String>>,
}

impl DeidentificationResult {
    /// Number of entities that were redacted.
    pub fn num_entities_redacted(&self) -> usize {
        self.pii_entities.len()
    }

    /// Whether any PII was detected.
    pub fn has_detections(&self) -> bool {
        !self.pii_entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pii_entity_from_fused() {
        let fused = FusedEntity {
            start: 8,
            end: 16,
            entity_type: "NAME".to_string(),
            confidence: 0.95,
            text: "John Doe".to_string(),
            source: FusionSource::Fused,
        };
        let pii = PiiEntity::from(&fused);
        assert_eq!(pii.text, "John Doe");
        assert_eq!(pii.entity_type, "NAME");
        assert_eq!(pii.start, 8);
        assert_eq!(pii.end, 16);
        assert!(pii.redacted_text.is_none());
        assert!(pii.hash_value.is_none());
    }

    #[test]
    fn test_result_serializes_without_mapping() {
        let result = DeidentificationResult {
            original_text: "John".to_string(),
            deidentified_text: "[NAME]".to_string(),
            pii_entities: vec![],
            method: "mask".to_string(),
            timestamp: Utc::now(),
            mapping: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("mapping").is_none());
        assert_eq!(json["method"], "mask");
    }

    #[test]
    fn test_result_counts() {
        let fused = FusedEntity {
            start: 0,
            end: 4,
            entity_type: "NAME".to_string(),
            confidence: 0.9,
            text: "John".to_string(),
            source: FusionSource::Model,
        };
        let result = DeidentificationResult {
            original_text: "John".to_string(),
            deidentified_text: "[NAME]".to_string(),
            pii_entities: vec![PiiEntity::from(&fused)],
            method: "mask".to_string(),
            timestamp: Utc::now(),
            mapping: None,
        };
        assert_eq!(result.num_entities_redacted(), 1);
        assert!(result.has_detections());
    }
}
