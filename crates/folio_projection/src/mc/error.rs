//! Error types for the projection engine.

use thiserror::Error;

/// Configuration error for the forward value projector.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProjectionConfigError {
    /// Path count above the supported maximum.
    #[error("Invalid path count {0}: must be in range [0, 1_000_000]")]
    InvalidPathCount(usize),
    /// Horizon outside the supported range.
    #[error("Invalid horizon {0} days: must be in range [1, 3650]")]
    InvalidHorizon(usize),
    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}
