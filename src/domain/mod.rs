//! Domain models and types for clinscrub.
//!
//! This module contains the core domain models, error types, and locale data:
//!
//! - **Entity types** ([`ModelFragment`], [`FusedEntity`], [`PiiEntity`],
//!   [`DeidentificationResult`]) — one closed struct per pipeline stage
//! - **Languages** ([`Language`]) — the supported locale set with month-name
//!   tables and date conventions
//! - **Errors** ([`ScrubError`]) and the crate [`Result`] alias
//!
//! All character offsets in these types refer to the original input text.

pub mod entity;
pub mod errors;
pub mod language;
pub mod result;

pub use entity::{DeidentificationResult, FusedEntity, FusionSource, ModelFragment, PiiEntity};
pub use errors::ScrubError;
pub use language::{Language, SUPPORTED_LANGUAGES};
pub use result::Result;
