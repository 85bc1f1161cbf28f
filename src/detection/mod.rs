//! Pattern-based PII detection
//!
//! Three layers: context keyword scanning around a candidate span,
//! structural validators for identifier types with checksums or known
//! shapes, and the semantic unit detector that ties them together.

pub mod context;
pub mod semantic;
pub mod validators;

pub use context::{has_context, DEFAULT_CONTEXT_WINDOW};
pub use semantic::{find_semantic_units, SemanticUnit};
pub use validators::ValidatorId;
