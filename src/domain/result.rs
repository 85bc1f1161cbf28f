//! Result type alias for clinscrub operations

use crate::domain::errors::ScrubError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScrubError>;
