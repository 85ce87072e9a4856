//! Normalised portfolio composition.

use super::normalizer::{normalize, WEIGHT_SUM_TOLERANCE};
use crate::types::{CoreError, Ticker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw weight given to a newly added asset before renormalisation.
pub const DEFAULT_NEW_ASSET_WEIGHT: f64 = 5.0;

/// Normalised portfolio composition in percent.
///
/// Asset percentages plus the cash percentage sum to 100 whenever the
/// portfolio holds anything; the empty portfolio has zero cash. Values are
/// only ever produced by normalisation, and every edit returns a new
/// portfolio so the sum invariant holds atomically.
///
/// # Examples
///
/// ```
/// use folio_core::portfolio::PortfolioWeights;
///
/// let portfolio = PortfolioWeights::from_raw([("AAPL", 60.0), ("GOOG", 40.0)], 0.0).unwrap();
/// let grown = portfolio.with_asset("tsla");
///
/// assert!(grown.holds("TSLA"));
/// assert!(grown.is_balanced());
/// assert!(!portfolio.holds("TSLA"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWeights {
    assets: BTreeMap<Ticker, f64>,
    cash: f64,
}

impl PortfolioWeights {
    /// Creates the empty portfolio.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalises raw weights and cash into a portfolio.
    ///
    /// Tickers are normalised first, so `"aapl"` and `"AAPL"` accumulate
    /// into one holding.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if a ticker is blank or any weight or the cash is
    /// negative or non-finite.
    pub fn from_raw<I, T>(weights: I, cash: f64) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (T, f64)>,
        T: AsRef<str>,
    {
        if !cash.is_finite() || cash < 0.0 {
            return Err(CoreError::InvalidCash(cash));
        }

        let mut raw: BTreeMap<Ticker, f64> = BTreeMap::new();
        for (symbol, weight) in weights {
            let ticker = Ticker::parse(symbol)?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(CoreError::InvalidWeight {
                    ticker: ticker.to_string(),
                    value: weight,
                });
            }
            *raw.entry(ticker).or_insert(0.0) += weight;
        }

        Ok(Self::normalised(&raw, cash))
    }

    fn normalised(raw: &BTreeMap<Ticker, f64>, cash: f64) -> Self {
        let (assets, cash) = normalize(raw, cash);
        Self { assets, cash }
    }

    /// Returns a new portfolio with `ticker` added at the default raw weight.
    ///
    /// Already-held tickers leave the portfolio unchanged.
    pub fn with_asset(&self, ticker: impl Into<Ticker>) -> Self {
        let ticker = ticker.into();
        if ticker.as_str().is_empty() || self.assets.contains_key(&ticker) {
            return self.clone();
        }

        let mut raw = self.assets.clone();
        raw.insert(ticker, DEFAULT_NEW_ASSET_WEIGHT);
        Self::normalised(&raw, self.cash)
    }

    /// Returns a new portfolio without `ticker`, renormalised.
    ///
    /// Tickers that are not held leave the portfolio unchanged.
    pub fn without_asset(&self, ticker: impl Into<Ticker>) -> Self {
        let ticker = ticker.into();
        if !self.assets.contains_key(&ticker) {
            return self.clone();
        }

        let mut raw = self.assets.clone();
        raw.remove(&ticker);
        Self::normalised(&raw, self.cash)
    }

    /// Returns the normalised percentage of `ticker`, if held.
    pub fn weight_of(&self, ticker: &str) -> Option<f64> {
        self.assets.get(Ticker::new(ticker).as_str()).copied()
    }

    /// Returns `true` if `ticker` is held.
    pub fn holds(&self, ticker: &str) -> bool {
        self.assets.contains_key(Ticker::new(ticker).as_str())
    }

    /// Returns the asset percentages keyed by ticker.
    #[inline]
    pub fn assets(&self) -> &BTreeMap<Ticker, f64> {
        &self.assets
    }

    /// Returns the held tickers in sorted order.
    pub fn tickers(&self) -> impl Iterator<Item = &Ticker> {
        self.assets.keys()
    }

    /// Returns the cash percentage.
    #[inline]
    pub fn cash_pct(&self) -> f64 {
        self.cash
    }

    /// Returns the number of held assets (cash excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns `true` if no assets are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Returns the sum of asset and cash percentages.
    pub fn total_pct(&self) -> f64 {
        self.assets.values().sum::<f64>() + self.cash
    }

    /// Returns `true` if the sum invariant holds.
    pub fn is_balanced(&self) -> bool {
        let total = self.total_pct();
        if self.assets.is_empty() && self.cash == 0.0 {
            return total == 0.0;
        }
        (total - 100.0).abs() <= 100.0 * WEIGHT_SUM_TOLERANCE
    }

    /// Returns `(tickers, fractions)` with asset weights as fractions in `0..=1`.
    pub fn weight_fractions(&self) -> (Vec<Ticker>, Vec<f64>) {
        self.assets
            .iter()
            .map(|(ticker, pct)| (ticker.clone(), pct / 100.0))
            .unzip()
    }
}
