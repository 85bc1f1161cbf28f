//! High-level orchestration
//!
//! [`ScrubEngine`] wires the pattern registry, fusion engine, and
//! de-identification pipeline together for one language. Construction
//! compiles the pattern catalogs and fails fast on an unsupported language
//! code; a built engine is immutable and cheap to share.

use crate::deidentify::{self, DeidentifyMethod, DeidentifyOptions};
use crate::deidentify::normalize::{has_accents, strip_accents};
use crate::detection::find_semantic_units;
use crate::domain::{DeidentificationResult, FusedEntity, FusionSource, Language, ModelFragment, Result};
use crate::fusion::{merge_entities_with_semantic_units, FusionConfig};
use crate::patterns::PatternRegistry;
use crate::text::slice_chars;
use std::borrow::Cow;
use tracing::debug;

/// Detection and de-identification engine for one language.
pub struct ScrubEngine {
    language: Language,
    registry: PatternRegistry,
    fusion: FusionConfig,
}

impl ScrubEngine {
    /// Build an engine for `language`, compiling its pattern catalogs.
    pub fn new(language: Language) -> Result<Self> {
        let registry = PatternRegistry::for_language(language)?;
        debug!(language = %language, patterns = registry.patterns().len(), "engine ready");
        Ok(Self {
            language,
            registry,
            fusion: FusionConfig::default(),
        })
    }

    /// Build an engine from an ISO 639-1 code. Unsupported codes fail here,
    /// before any text is processed.
    pub fn for_language_code(code: &str) -> Result<Self> {
        Self::new(code.parse()?)
    }

    /// Replace the default fusion configuration.
    pub fn with_fusion_config(mut self, config: FusionConfig) -> Self {
        self.fusion = config;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Pattern-only detection, for callers without a token model.
    ///
    /// Every semantic unit becomes a pattern-sourced entity; confidence is
    /// the pattern score, so callers apply their own threshold.
    pub fn detect(&self, text: &str) -> Vec<FusedEntity> {
        find_semantic_units(text, self.registry.patterns())
            .into_iter()
            .map(|unit| FusedEntity {
                start: unit.start,
                end: unit.end,
                entity_type: unit.entity_type,
                confidence: unit.score,
                text: slice_chars(text, unit.start, unit.end).to_string(),
                source: FusionSource::Pattern,
            })
            .collect()
    }

    /// Fuse external model fragments with pattern-detected semantic units.
    pub fn merge(&self, text: &str, fragments: &[ModelFragment]) -> Vec<FusedEntity> {
        let units = find_semantic_units(text, self.registry.patterns());
        merge_entities_with_semantic_units(text, fragments, &units, &self.fusion)
    }

    /// Full pipeline: fuse, then redact with `method`.
    pub fn deidentify(
        &self,
        text: &str,
        fragments: &[ModelFragment],
        method: DeidentifyMethod,
        options: &DeidentifyOptions,
    ) -> Result<DeidentificationResult> {
        let entities = self.merge(text, fragments);
        deidentify::deidentify(text, &entities, method, options, self.language)
    }

    /// Prepare text for model inference: strips accents for languages whose
    /// models expect unaccented input. Character count is preserved, so
    /// fragment offsets from the model remain valid against the original.
    pub fn normalize_for_model<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.language.normalize_accents() && has_accents(text) {
            Cow::Owned(strip_accents(text))
        } else {
            Cow::Borrowed(text)
        }
    }
}
