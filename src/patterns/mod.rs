//! Pattern catalog for PII detection
//!
//! Patterns are immutable data tables: a regex, a canonical entity type, a
//! priority rank for overlap resolution, a low base score, context keywords
//! with a boost, and an optional structural validator referenced by
//! identifier. The per-language catalogs live in TOML files embedded at
//! compile time; English is the universal base and the other languages add
//! their locale patterns on top.
//!
//! Catalogs are static data, so any invalid regex or unknown validator id
//! fails loudly at registry construction rather than at call time.

use crate::detection::validators::ValidatorId;
use crate::domain::{Language, Result, ScrubError};
use fancy_regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const EN_CATALOG: &str = include_str!("../../patterns/en.toml");
const FR_CATALOG: &str = include_str!("../../patterns/fr.toml");
const DE_CATALOG: &str = include_str!("../../patterns/de.toml");
const IT_CATALOG: &str = include_str!("../../patterns/it.toml");
const ES_CATALOG: &str = include_str!("../../patterns/es.toml");

/// Pattern definition as written in a TOML catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regular expression (fancy-regex syntax, look-around allowed)
    pub regex: String,
    /// Canonical entity type tag
    pub entity_type: String,
    /// Overlap tie-break rank, higher wins
    pub priority: u8,
    /// Confidence for a bare match without context
    pub base_score: f32,
    /// Keywords that raise confidence when found nearby
    #[serde(default)]
    pub context_words: Vec<String>,
    /// Score added when a context keyword is present
    #[serde(default)]
    pub context_boost: f32,
    /// Structural validator id, if the type has one
    #[serde(default)]
    pub validator: Option<String>,
    /// Compile the regex case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,
}

#[derive(Debug, Deserialize)]
struct PatternCatalog {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// A compiled detection pattern.
#[derive(Debug, Clone)]
pub struct PiiPattern {
    /// Catalog name of this pattern
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// Canonical entity type tag
    pub entity_type: String,
    /// Overlap tie-break rank, higher wins
    pub priority: u8,
    /// Confidence for a bare match without context
    pub base_score: f32,
    /// Keywords that raise confidence when found nearby
    pub context_words: Vec<String>,
    /// Score added when a context keyword is present
    pub context_boost: f32,
    /// Structural validator, if the type has one
    pub validator: Option<ValidatorId>,
}

impl PiiPattern {
    fn compile(name: &str, def: &PatternDefinition) -> Result<Self> {
        let source = if def.case_insensitive {
            format!("(?i){}", def.regex)
        } else {
            def.regex.clone()
        };
        let regex = Regex::new(&source).map_err(|e| {
            ScrubError::Pattern(format!("invalid regex in pattern '{name}': {e}"))
        })?;
        let validator = def
            .validator
            .as_deref()
            .map(|id| {
                id.parse::<ValidatorId>().map_err(|_| {
                    ScrubError::Pattern(format!("unknown validator '{id}' in pattern '{name}'"))
                })
            })
            .transpose()?;
        Ok(Self {
            name: name.to_string(),
            regex,
            entity_type: def.entity_type.clone(),
            priority: def.priority,
            base_score: def.base_score,
            context_words: def.context_words.clone(),
            context_boost: def.context_boost,
            validator,
        })
    }
}

/// Immutable registry of compiled patterns for one language.
///
/// Safe to share across calls and threads without locking.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<PiiPattern>,
}

impl PatternRegistry {
    /// Build the combined registry for a language: the English base plus the
    /// language-specific catalog.
    pub fn for_language(language: Language) -> Result<Self> {
        let mut registry = Self::from_toml(EN_CATALOG)?;
        let extra = match language {
            Language::English => None,
            Language::French => Some(FR_CATALOG),
            Language::German => Some(DE_CATALOG),
            Language::Italian => Some(IT_CATALOG),
            Language::Spanish => Some(ES_CATALOG),
        };
        if let Some(catalog) = extra {
            registry.extend(Self::from_toml(catalog)?);
        }
        Ok(registry)
    }

    /// Parse and compile a catalog from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let catalog: PatternCatalog = toml::from_str(content)?;
        let mut patterns = Vec::with_capacity(catalog.patterns.len());
        for (name, def) in &catalog.patterns {
            patterns.push(PiiPattern::compile(name, def)?);
        }
        Ok(Self { patterns })
    }

    /// Load a catalog from a TOML file (custom pattern libraries).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScrubError::Io(format!(
                "failed to read pattern catalog {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// All patterns in this registry.
    pub fn patterns(&self) -> &[PiiPattern] {
        &self.patterns
    }

    /// Patterns for a specific entity type.
    pub fn patterns_for_type(&self, entity_type: &str) -> Vec<&PiiPattern> {
        self.patterns
            .iter()
            .filter(|p| p.entity_type == entity_type)
            .collect()
    }

    /// Append the patterns of another registry.
    pub fn extend(&mut self, other: PatternRegistry) {
        self.patterns.extend(other.patterns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_catalog_compiles() {
        let registry = PatternRegistry::for_language(Language::English).unwrap();
        assert!(!registry.patterns().is_empty());
    }

    #[test]
    fn test_all_language_catalogs_compile() {
        for lang in crate::domain::SUPPORTED_LANGUAGES {
            let registry = PatternRegistry::for_language(lang).unwrap();
            assert!(!registry.patterns().is_empty(), "empty catalog for {lang}");
        }
    }

    #[test]
    fn test_non_english_includes_base() {
        let en = PatternRegistry::for_language(Language::English).unwrap();
        let fr = PatternRegistry::for_language(Language::French).unwrap();
        assert!(fr.patterns().len() > en.patterns().len());
        assert!(fr.patterns().iter().any(|p| p.name == "ssn"));
        assert!(fr.patterns().iter().any(|p| p.name == "fr_nir"));
    }

    #[test]
    fn test_email_pattern_matches() {
        let registry = PatternRegistry::for_language(Language::English).unwrap();
        let email = registry
            .patterns()
            .iter()
            .find(|p| p.entity_type == "email")
            .unwrap();
        assert!(email.regex.is_match("test@example.com").unwrap());
        assert!(!email.regex.is_match("not-an-email").unwrap());
    }

    #[test]
    fn test_national_id_patterns_have_validators() {
        for lang in [Language::French, Language::German, Language::Italian, Language::Spanish] {
            let registry = PatternRegistry::for_language(lang).unwrap();
            for pattern in registry.patterns_for_type("national_id") {
                assert!(
                    pattern.validator.is_some(),
                    "national_id pattern '{}' has no validator",
                    pattern.name
                );
            }
        }
    }

    #[test]
    fn test_invalid_regex_fails_at_construction() {
        let toml = r#"
            [patterns.bad]
            regex = '([unclosed'
            entity_type = "x"
            priority = 1
            base_score = 0.5
        "#;
        let err = PatternRegistry::from_toml(toml).unwrap_err();
        assert!(matches!(err, ScrubError::Pattern(_)));
    }

    #[test]
    fn test_unknown_validator_fails_at_construction() {
        let toml = r#"
            [patterns.bad]
            regex = '\d+'
            entity_type = "x"
            priority = 1
            base_score = 0.5
            validator = "not_a_validator"
        "#;
        let err = PatternRegistry::from_toml(toml).unwrap_err();
        assert!(matches!(err, ScrubError::Pattern(_)));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [patterns.custom_id]
            regex = '\bID-\d{{4}}\b'
            entity_type = "id_num"
            priority = 5
            base_score = 0.6
            "#
        )
        .unwrap();
        let registry = PatternRegistry::from_file(file.path()).unwrap();
        assert_eq!(registry.patterns().len(), 1);
        assert_eq!(registry.patterns()[0].entity_type, "id_num");
    }
}
