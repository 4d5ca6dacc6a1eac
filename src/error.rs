//! Error type returned by the footprint and hierarchy core.

use thiserror::Error;

/// Typed failures of the core operations.
///
/// IO adapters wrap these in `anyhow::Error` with file context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A dimension or geometry is unusable (non-positive side, length or width).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A centroid entry could not be parsed into two finite, in-range numbers.
    /// `line` is 1-based.
    #[error("malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// A tuning parameter lies outside its accepted range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The coordinate transform could not be built or applied.
    #[error("projection failed: {0}")]
    Projection(String),
}

/// Result alias for the core operations.
pub type Result<T> = std::result::Result<T, Error>;
