//! # clinscrub - PII/PHI Detection and De-identification
//!
//! clinscrub detects personally identifiable information in clinical text and
//! rewrites it for safe secondary use. It combines a pattern-based semantic
//! unit detector with a confidence fusion engine that corroborates and
//! reassembles fragmentary predictions from an external token classification
//! model.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** PII spans with per-language pattern catalogs, context
//!   keywords, and structural validators (checksums, known shapes)
//! - **Fusing** model fragments with pattern evidence into complete entities
//! - **De-identifying** text via mask, remove, replace, hash, or date-shift
//!   strategies, with optional re-identification mappings
//! - **Supporting** English, French, German, Italian, and Spanish clinical
//!   text, including locale date conventions and accent normalization
//!
//! ## Architecture
//!
//! - [`engine`] - High-level orchestration ([`engine::ScrubEngine`])
//! - [`detection`] - Semantic units, context scanning, validators
//! - [`fusion`] - Fragment clustering and model/pattern fusion
//! - [`deidentify`] - Redaction methods, date shifting, fake data
//! - [`patterns`] - Per-language pattern catalogs (TOML, embedded)
//! - [`domain`] - Entity models, languages, errors
//! - [`text`] - Character-offset utilities
//!
//! All public offsets are character offsets into the original input text,
//! so spans survive accent normalization and multibyte content.
//!
//! ## Quick Start
//!
//! ```rust
//! use clinscrub::deidentify::{DeidentifyMethod, DeidentifyOptions};
//! use clinscrub::domain::Language;
//! use clinscrub::engine::ScrubEngine;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = ScrubEngine::new(Language::English)?;
//!     let result = engine.deidentify(
//!         "Patient SSN: 123-45-6789",
//!         &[],
//!         DeidentifyMethod::Mask,
//!         &DeidentifyOptions::default(),
//!     )?;
//!     assert_eq!(result.deidentified_text, "Patient SSN: [ssn]");
//!     Ok(())
//! }
//! ```
//!
//! Model-assisted detection feeds the classifier's raw fragments into the
//! same pipeline:
//!
//! ```rust
//! use clinscrub::domain::{Language, ModelFragment};
//! use clinscrub::engine::ScrubEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ScrubEngine::new(Language::English)?;
//! let text = "SSN: 123-45-6789";
//! // A token model often splits one identifier across fragments.
//! let fragments = vec![
//!     ModelFragment::new(5, 8, "ssn", 0.91, "123"),
//!     ModelFragment::new(9, 11, "ssn", 0.88, "45"),
//!     ModelFragment::new(12, 16, "ssn", 0.90, "6789"),
//! ];
//! let entities = engine.merge(text, &fragments);
//! assert_eq!(entities[0].text, "123-45-6789");
//! # Ok(())
//! # }
//! ```

pub mod deidentify;
pub mod detection;
pub mod domain;
pub mod engine;
pub mod fusion;
pub mod patterns;
pub mod text;

pub use deidentify::{reidentify, DeidentifyMethod, DeidentifyOptions};
pub use domain::{
    DeidentificationResult, FusedEntity, FusionSource, Language, ModelFragment, PiiEntity, Result,
    ScrubError,
};
pub use engine::ScrubEngine;
