//! CLI error types.

use crate::config::ConfigError;
use folio_core::CoreError;
use folio_projection::ProjectionConfigError;
use thiserror::Error;

/// Errors surfaced by `folio` commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid portfolio: {0}")]
    Portfolio(#[from] CoreError),

    #[error("Invalid projection settings: {0}")]
    Projection(#[from] ProjectionConfigError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Refresh did not complete: {0}")]
    RefreshFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_converts() {
        let err: CliError = CoreError::EmptyTicker.into();
        assert_eq!(err.to_string(), "Invalid portfolio: Ticker is empty");
    }

    #[test]
    fn test_projection_error_converts() {
        let err: CliError = ProjectionConfigError::InvalidHorizon(0).into();
        assert!(err.to_string().starts_with("Invalid projection settings"));
    }
}
