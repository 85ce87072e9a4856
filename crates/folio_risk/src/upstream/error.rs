//! Errors raised by upstream collaborators.

use thiserror::Error;

/// Failure of an upstream collaborator call.
///
/// Callers log these and continue with a degraded view; none is fatal.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Reading the payload failed.
    #[error("upstream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload could not be decoded.
    #[error("malformed upstream payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The collaborator could not serve the request.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}
