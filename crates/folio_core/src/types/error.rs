//! Error types for foundation value construction.
//!
//! The analytics themselves are total functions; errors only arise when a
//! caller tries to build a value that violates its invariants.

use thiserror::Error;

/// Errors raised while constructing core values.
///
/// # Examples
/// ```
/// use folio_core::types::CoreError;
///
/// let err = CoreError::InvalidWindow(0);
/// assert_eq!(format!("{}", err), "Invalid rolling window 0: must be at least 1");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Ticker was empty after trimming.
    #[error("Ticker is empty")]
    EmptyTicker,

    /// Asset weight was negative or non-finite.
    #[error("Invalid weight for {ticker}: {value}")]
    InvalidWeight {
        /// Normalised ticker symbol.
        ticker: String,
        /// Offending raw weight.
        value: f64,
    },

    /// Cash amount was negative or non-finite.
    #[error("Invalid cash amount: {0}")]
    InvalidCash(f64),

    /// Initial capital was negative or non-finite.
    #[error("Invalid initial capital: {0}")]
    InvalidCapital(f64),

    /// Rolling window length was zero.
    #[error("Invalid rolling window {0}: must be at least 1")]
    InvalidWindow(usize),

    /// Annualisation factor was not strictly positive.
    #[error("Invalid annualisation factor {0}: must be positive and finite")]
    InvalidAnnualisationFactor(f64),
}
