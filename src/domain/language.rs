//! Supported languages and locale data

use crate::domain::errors::ScrubError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages with a pattern catalog and locale conventions.
///
/// Unsupported language codes are rejected up front; the library never
/// silently falls back to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    French,
    German,
    Italian,
    Spanish,
}

/// All supported languages, in catalog order.
pub const SUPPORTED_LANGUAGES: [Language; 5] = [
    Language::English,
    Language::French,
    Language::German,
    Language::Italian,
    Language::Spanish,
];

impl Language {
    /// ISO 639-1 code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
            Self::German => "de",
            Self::Italian => "it",
            Self::Spanish => "es",
        }
    }

    /// Human-readable English name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::French => "French",
            Self::German => "German",
            Self::Italian => "Italian",
            Self::Spanish => "Spanish",
        }
    }

    /// Month names in this language, January first.
    ///
    /// Used for parsing and re-serializing month-name date forms.
    pub fn month_names(&self) -> &'static [&'static str; 12] {
        match self {
            Self::English => &[
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ],
            Self::French => &[
                "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
                "septembre", "octobre", "novembre", "décembre",
            ],
            Self::German => &[
                "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August",
                "September", "Oktober", "November", "Dezember",
            ],
            Self::Italian => &[
                "gennaio", "febbraio", "marzo", "aprile", "maggio", "giugno", "luglio", "agosto",
                "settembre", "ottobre", "novembre", "dicembre",
            ],
            Self::Spanish => &[
                "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
                "septiembre", "octubre", "noviembre", "diciembre",
            ],
        }
    }

    /// Whether numeric dates in this language are conventionally day-first
    /// (DD/MM/YYYY rather than MM/DD/YYYY).
    pub fn day_first(&self) -> bool {
        !matches!(self, Self::English)
    }

    /// Whether PII models for this language were trained on unaccented text,
    /// requiring accent stripping before inference.
    pub fn normalize_accents(&self) -> bool {
        matches!(self, Self::Spanish)
    }
}

impl FromStr for Language {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Self::English),
            "fr" => Ok(Self::French),
            "de" => Ok(Self::German),
            "it" => Ok(Self::Italian),
            "es" => Ok(Self::Spanish),
            other => Err(ScrubError::UnsupportedLanguage(format!(
                "unsupported language '{}', supported: en, fr, de, it, es",
                other
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
