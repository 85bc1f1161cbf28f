//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.
//! Pattern catalogs are static data validated once at construction, so a
//! malformed catalog fails loudly here rather than at call time.

use thiserror::Error;

/// Main clinscrub error type
#[derive(Debug, Error)]
pub enum ScrubError {
    /// Language code outside the supported set
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Pattern catalog errors (invalid regex, unknown validator id, bad TOML)
    #[error("Pattern catalog error: {0}")]
    Pattern(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors (pattern catalog file loading)
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for ScrubError {
    fn from(err: std::io::Error) -> Self {
        ScrubError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ScrubError {
    fn from(err: serde_json::Error) -> Self {
        ScrubError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ScrubError {
    fn from(err: toml::de::Error) -> Self {
        ScrubError::Pattern(format!("TOML parse error: {err}"))
    }
}
