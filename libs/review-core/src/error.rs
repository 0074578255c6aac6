//! Error types for review-core.

use thiserror::Error;

/// Result type alias using ReviewError.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Errors raised by the validating scheduler entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("invalid difficulty {value}: expected 1 (easy), 2 (medium) or 3 (hard)")]
    InvalidDifficulty { value: i64 },
}
