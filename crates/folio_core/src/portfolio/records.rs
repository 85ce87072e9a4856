//! Persistence row mapping.
//!
//! The persistence collaborator stores one row per (user, ticker) and keeps
//! the cash percentage under a synthetic `CASH` ticker.

use super::weights::PortfolioWeights;
use crate::types::{CoreError, Ticker};
use serde::{Deserialize, Serialize};

/// Reserved ticker under which the cash percentage is persisted.
pub const CASH_TICKER: &str = "CASH";

/// One persisted holding row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    /// Holding ticker, or [`CASH_TICKER`] for the cash row.
    pub ticker: Ticker,
    /// Normalised percentage.
    pub weight: f64,
}

impl HoldingRecord {
    /// Creates a new holding row.
    pub fn new(ticker: impl Into<Ticker>, weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            weight,
        }
    }

    /// Returns `true` if this is the synthetic cash row.
    #[inline]
    pub fn is_cash(&self) -> bool {
        self.ticker.as_str() == CASH_TICKER
    }
}

impl PortfolioWeights {
    /// Converts the portfolio to persistence rows, cash row last.
    pub fn to_records(&self) -> Vec<HoldingRecord> {
        self.assets()
            .iter()
            .map(|(ticker, weight)| HoldingRecord::new(ticker, *weight))
            .chain(std::iter::once(HoldingRecord::new(CASH_TICKER, self.cash_pct())))
            .collect()
    }

    /// Rebuilds a portfolio from persistence rows.
    ///
    /// The `CASH` row (if any) becomes the cash amount; the last one wins
    /// when duplicated. The result is renormalised, which leaves rows that
    /// were written from a normalised portfolio unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if any row carries a negative or non-finite weight.
    pub fn from_records<'a, I>(records: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = &'a HoldingRecord>,
    {
        let mut cash = 0.0;
        let mut assets = Vec::new();
        for record in records {
            if record.is_cash() {
                cash = record.weight;
            } else {
                assets.push((record.ticker.as_str(), record.weight));
            }
        }
        Self::from_raw(assets, cash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_to_records_appends_cash_row() {
        let portfolio = PortfolioWeights::from_raw([("AAPL", 60.0), ("GOOG", 20.0)], 20.0).unwrap();
        let rows = portfolio.to_records();

        assert_eq!(rows.len(), 3);
        assert!(rows[2].is_cash());
        assert_relative_eq!(rows[2].weight, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_records_round_trip() {
        let portfolio = PortfolioWeights::from_raw([("BTC", 10.0), ("VOO", 70.0)], 20.0).unwrap();
        let restored = PortfolioWeights::from_records(&portfolio.to_records()).unwrap();

        assert_relative_eq!(restored.cash_pct(), portfolio.cash_pct(), epsilon = 1e-9);
        assert_relative_eq!(
            restored.weight_of("VOO").unwrap(),
            portfolio.weight_of("VOO").unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_from_records_lowercase_cash_row() {
        let rows = vec![HoldingRecord::new("spy", 50.0), HoldingRecord::new("cash", 50.0)];
        let portfolio = PortfolioWeights::from_records(&rows).unwrap();

        assert_eq!(portfolio.len(), 1);
        assert_relative_eq!(portfolio.cash_pct(), 50.0, epsilon = 1e-12);
    }
}
