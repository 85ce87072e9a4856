//! Caller-owned portfolio state.
//!
//! A [`PortfolioSession`] holds the normalised weights, the initial capital
//! and the cash balance. Edits replace the whole weights value; background
//! work operates on an immutable [`PortfolioSnapshot`].

use crate::upstream::RiskRequest;
use folio_core::{CoreError, PortfolioWeights, Ticker, CASH_TICKER};

/// Default initial capital in currency units.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

fn check_amount(value: f64, err: fn(f64) -> CoreError) -> Result<f64, CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(err(value));
    }
    Ok(value)
}

/// Immutable copy of a portfolio's state.
#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioSnapshot {
    weights: PortfolioWeights,
    initial_capital: f64,
    cash_balance: f64,
}

impl PortfolioSnapshot {
    /// Normalised weights.
    #[inline]
    pub fn weights(&self) -> &PortfolioWeights {
        &self.weights
    }

    /// Initial capital in currency units.
    #[inline]
    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// Liquid cash in currency units.
    #[inline]
    pub fn cash_balance(&self) -> f64 {
        self.cash_balance
    }

    /// Contributed value before returns: initial capital plus cash.
    #[inline]
    pub fn contributed_value(&self) -> f64 {
        self.initial_capital + self.cash_balance
    }

    /// Shapes the upstream risk request.
    ///
    /// Tickers carry their weights as fractions; a non-zero cash share is
    /// sent as a trailing `CASH` entry.
    pub fn risk_request(&self) -> RiskRequest {
        let (mut tickers, mut weights) = self.weights.weight_fractions();
        let cash_fraction = self.weights.cash_pct() / 100.0;
        if cash_fraction > 0.0 {
            tickers.push(Ticker::new(CASH_TICKER));
            weights.push(cash_fraction);
        }
        RiskRequest {
            tickers,
            weights,
            portfolio_value: self.contributed_value(),
        }
    }
}

/// Mutable portfolio state owned by one caller.
///
/// # Examples
///
/// ```rust
/// use folio_risk::session::PortfolioSession;
///
/// let mut session = PortfolioSession::new(100_000.0).unwrap();
/// session.replace_weights([("AAPL", 60.0), ("GOOG", 40.0)], 0.0).unwrap();
/// session.add_asset("tsla");
///
/// let request = session.risk_request();
/// assert_eq!(request.tickers.len(), 3);
/// assert!((request.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioSession {
    state: PortfolioSnapshot,
}

impl Default for PortfolioSession {
    fn default() -> Self {
        Self {
            state: PortfolioSnapshot {
                weights: PortfolioWeights::empty(),
                initial_capital: DEFAULT_INITIAL_CAPITAL,
                cash_balance: 0.0,
            },
        }
    }
}

impl PortfolioSession {
    /// Creates an empty session with the given initial capital.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCapital`] for a negative or non-finite amount.
    pub fn new(initial_capital: f64) -> Result<Self, CoreError> {
        let mut session = Self::default();
        session.set_initial_capital(initial_capital)?;
        Ok(session)
    }

    /// Replaces the whole portfolio from raw weights and a cash balance.
    ///
    /// The cash balance takes part in normalisation alongside the raw weights.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` for blank tickers or invalid weights or cash. The
    /// session is unchanged on error.
    pub fn replace_weights<I, T>(&mut self, raw: I, cash_balance: f64) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = (T, f64)>,
        T: AsRef<str>,
    {
        let cash_balance = check_amount(cash_balance, CoreError::InvalidCash)?;
        let weights = PortfolioWeights::from_raw(raw, cash_balance)?;
        self.state.weights = weights;
        self.state.cash_balance = cash_balance;
        Ok(())
    }

    /// Adds `ticker` at the default raw weight and renormalises.
    pub fn add_asset(&mut self, ticker: impl Into<Ticker>) {
        self.state.weights = self.state.weights.with_asset(ticker);
    }

    /// Removes `ticker` and renormalises.
    pub fn remove_asset(&mut self, ticker: impl Into<Ticker>) {
        self.state.weights = self.state.weights.without_asset(ticker);
    }

    /// Sets the initial capital.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCapital`] for a negative or non-finite amount.
    pub fn set_initial_capital(&mut self, initial_capital: f64) -> Result<(), CoreError> {
        self.state.initial_capital = check_amount(initial_capital, CoreError::InvalidCapital)?;
        Ok(())
    }

    /// Normalised weights.
    #[inline]
    pub fn weights(&self) -> &PortfolioWeights {
        &self.state.weights
    }

    /// Initial capital in currency units.
    #[inline]
    pub fn initial_capital(&self) -> f64 {
        self.state.initial_capital
    }

    /// Liquid cash in currency units.
    #[inline]
    pub fn cash_balance(&self) -> f64 {
        self.state.cash_balance
    }

    /// Shapes the upstream risk request for the current state.
    pub fn risk_request(&self) -> RiskRequest {
        self.state.risk_request()
    }

    /// Immutable copy for background work.
    pub fn snapshot(&self) -> PortfolioSnapshot {
        self.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_rejects_bad_capital() {
        assert!(matches!(
            PortfolioSession::new(-1.0),
            Err(CoreError::InvalidCapital(_))
        ));
        assert!(PortfolioSession::new(f64::NAN).is_err());
        assert_eq!(PortfolioSession::new(0.0).unwrap().initial_capital(), 0.0);
    }

    #[test]
    fn test_replace_weights_normalises() {
        let mut session = PortfolioSession::new(100_000.0).unwrap();
        session
            .replace_weights([("aapl", 30.0), ("GOOG", 50.0)], 20.0)
            .unwrap();

        assert_relative_eq!(session.weights().weight_of("AAPL").unwrap(), 30.0);
        assert_relative_eq!(session.weights().cash_pct(), 20.0);
        assert_eq!(session.cash_balance(), 20.0);
    }

    #[test]
    fn test_failed_replace_leaves_state() {
        let mut session = PortfolioSession::new(1_000.0).unwrap();
        session.replace_weights([("AAPL", 100.0)], 0.0).unwrap();
        let before = session.snapshot();

        assert!(session.replace_weights([("AAPL", -1.0)], 0.0).is_err());
        assert!(session.replace_weights([("AAPL", 1.0)], -5.0).is_err());
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_add_and_remove_asset() {
        let mut session = PortfolioSession::new(1_000.0).unwrap();
        session.replace_weights([("AAPL", 95.0)], 0.0).unwrap();

        session.add_asset("goog");
        assert_relative_eq!(session.weights().weight_of("GOOG").unwrap(), 5.0);
        assert_relative_eq!(session.weights().weight_of("AAPL").unwrap(), 95.0);

        session.remove_asset("AAPL");
        assert_relative_eq!(session.weights().weight_of("GOOG").unwrap(), 100.0);
        assert!(!session.weights().holds("AAPL"));
    }

    #[test]
    fn test_risk_request_includes_cash_row() {
        let mut session = PortfolioSession::new(50_000.0).unwrap();
        session
            .replace_weights([("AAPL", 60.0), ("GOOG", 20.0)], 20.0)
            .unwrap();
        let request = session.risk_request();

        let names: Vec<&str> = request.tickers.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["AAPL", "GOOG", "CASH"]);
        assert_relative_eq!(request.weights[0], 0.6);
        assert_relative_eq!(request.weights[2], 0.2);
        assert_relative_eq!(request.portfolio_value, 50_020.0);
    }

    #[test]
    fn test_risk_request_without_cash() {
        let mut session = PortfolioSession::new(10.0).unwrap();
        session.replace_weights([("AAPL", 1.0)], 0.0).unwrap();
        let request = session.risk_request();
        assert_eq!(request.tickers.len(), 1);
        assert_eq!(request.weights, vec![1.0]);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut session = PortfolioSession::new(10.0).unwrap();
        session.replace_weights([("AAPL", 1.0)], 0.0).unwrap();
        let snapshot = session.snapshot();
        session.add_asset("GOOG");

        assert_eq!(snapshot.weights().len(), 1);
        assert_eq!(session.weights().len(), 2);
    }
}
