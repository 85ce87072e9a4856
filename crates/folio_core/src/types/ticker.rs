//! Ticker identifier type.
//!
//! Tickers arrive from user input and from upstream payloads with
//! inconsistent casing and stray whitespace. [`Ticker`] normalises on
//! construction so that map lookups across payloads agree.

use super::error::CoreError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Normalised asset ticker (trimmed, uppercase).
///
/// # Examples
///
/// ```
/// use folio_core::types::Ticker;
///
/// let ticker = Ticker::new("  aapl ");
/// assert_eq!(ticker.as_str(), "AAPL");
/// assert_eq!(ticker, Ticker::new("AAPL"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Creates a ticker, trimming and uppercasing the input.
    #[inline]
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }

    /// Creates a ticker, rejecting input that is empty after trimming.
    pub fn parse(symbol: impl AsRef<str>) -> Result<Self, CoreError> {
        let ticker = Self::new(symbol);
        if ticker.0.is_empty() {
            return Err(CoreError::EmptyTicker);
        }
        Ok(ticker)
    }

    /// Returns the ticker as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Ticker> for Ticker {
    fn from(t: &Ticker) -> Self {
        t.clone()
    }
}

impl From<Ticker> for String {
    fn from(t: Ticker) -> Self {
        t.0
    }
}

impl Borrow<str> for Ticker {
    fn borrow(&self) -> &str {
        &self.0
    }
}
