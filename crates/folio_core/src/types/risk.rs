//! Upstream risk and analytics payload types.
//!
//! These mirror the JSON produced by the upstream risk-data service. They
//! are read-only to the engine; every collection field defaults to empty so
//! that a partially populated payload still deserialises.

use serde::{Deserialize, Serialize};

/// Trading days per year used for volatility annualisation.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Baseline risk metrics for a portfolio or a single asset.
///
/// `var`, `es` and `max_drawdown` are loss fractions (0.05 = 5% loss).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskMetrics {
    /// Value at Risk as a loss fraction.
    pub var: f64,
    /// Expected Shortfall as a loss fraction.
    pub es: f64,
    /// Sharpe ratio (unitless).
    pub sharpe: f64,
    /// Maximum drawdown as a loss fraction.
    pub max_drawdown: f64,
    /// Volatility; see [`VolatilityBasis`] for its time basis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Beta against the market (unitless).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
}

/// Time basis of an upstream volatility figure.
///
/// The upstream service does not label its volatility, so the basis is a
/// configuration decision applied uniformly wherever the figure is consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityBasis {
    /// Volatility is annualised (σ_daily × √252).
    #[default]
    #[serde(alias = "annualized")]
    Annualised,
    /// Volatility is a daily standard deviation.
    Daily,
}

impl VolatilityBasis {
    /// Converts a volatility in this basis to a daily figure.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_core::types::VolatilityBasis;
    ///
    /// let daily = VolatilityBasis::Annualised.to_daily(252.0_f64.sqrt() * 0.01);
    /// assert!((daily - 0.01).abs() < 1e-12);
    /// assert_eq!(VolatilityBasis::Daily.to_daily(0.02), 0.02);
    /// ```
    #[inline]
    pub fn to_daily(&self, volatility: f64) -> f64 {
        match self {
            Self::Annualised => volatility / TRADING_DAYS_PER_YEAR.sqrt(),
            Self::Daily => volatility,
        }
    }

    /// Converts a volatility in this basis to an annualised figure.
    #[inline]
    pub fn to_annualised(&self, volatility: f64) -> f64 {
        match self {
            Self::Annualised => volatility,
            Self::Daily => volatility * TRADING_DAYS_PER_YEAR.sqrt(),
        }
    }

    /// Returns the configuration name of the basis.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Annualised => "annualised",
            Self::Daily => "daily",
        }
    }
}

impl std::str::FromStr for VolatilityBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "annualised" | "annualized" | "annual" => Ok(Self::Annualised),
            "daily" => Ok(Self::Daily),
            other => Err(format!(
                "Unknown volatility basis '{}'. Supported: annualised, daily",
                other
            )),
        }
    }
}

/// One point of a cumulative-return series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// Observation date label as supplied upstream.
    pub date: String,
    /// Cumulative return since the series start, as a fraction.
    pub value: f64,
}

/// One point of a drawdown series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    /// Observation date label.
    pub date: String,
    /// Drawdown from the running peak, as a fraction.
    pub drawdown: f64,
}

/// One bucket of the daily-return histogram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Bucket label (e.g. `"-1.25%"`).
    pub bin: String,
    /// Number of observations in the bucket.
    pub count: u64,
}

/// Historical analytics for a portfolio or asset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSeries {
    /// Best single-day return, as a fraction.
    #[serde(default)]
    pub best_day: f64,
    /// Worst single-day return, as a fraction.
    #[serde(default)]
    pub worst_day: f64,
    /// Chronological cumulative returns.
    #[serde(default)]
    pub cumulative_returns: Vec<CumulativePoint>,
    /// Chronological drawdowns.
    #[serde(default)]
    pub drawdown_series: Vec<DrawdownPoint>,
    /// Return distribution buckets.
    #[serde(default)]
    pub return_histogram: Vec<HistogramBin>,
}

impl AnalyticsSeries {
    /// Creates a series holding only cumulative returns.
    pub fn from_cumulative<I, S>(points: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            cumulative_returns: points
                .into_iter()
                .map(|(date, value)| CumulativePoint {
                    date: date.into(),
                    value,
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Returns the most recent cumulative return, if any.
    #[inline]
    pub fn latest_cumulative_return(&self) -> Option<f64> {
        self.cumulative_returns.last().map(|p| p.value)
    }

    /// Returns the number of cumulative-return observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.cumulative_returns.len()
    }

    /// Returns `true` if there are no cumulative-return observations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cumulative_returns.is_empty()
    }
}

/// Upstream day-over-day change report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TodayChange {
    /// Latest portfolio return in percent.
    #[serde(default)]
    pub change_pct: f64,
    /// Absolute change in currency, when the service reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_abs: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_risk_metrics_optional_fields() {
        let json = r#"{"var": 0.04, "es": 0.06, "sharpe": 1.1, "max_drawdown": 0.2}"#;
        let metrics: RiskMetrics = serde_json::from_str(json).unwrap();

        assert_eq!(metrics.volatility, None);
        assert_eq!(metrics.beta, None);
        assert_relative_eq!(metrics.var, 0.04);
    }

    #[test]
    fn test_analytics_partial_payload() {
        let json = r#"{
            "best_day": 0.03,
            "cumulative_returns": [{"date": "2024-01-02", "value": 0.01}]
        }"#;
        let series: AnalyticsSeries = serde_json::from_str(json).unwrap();

        assert_eq!(series.len(), 1);
        assert!(series.drawdown_series.is_empty());
        assert_eq!(series.latest_cumulative_return(), Some(0.01));
    }

    #[test]
    fn test_latest_cumulative_return_empty() {
        assert_eq!(AnalyticsSeries::default().latest_cumulative_return(), None);
    }

    #[test]
    fn test_volatility_basis_round_trip() {
        let annual = VolatilityBasis::Daily.to_annualised(0.01);
        assert_relative_eq!(VolatilityBasis::Annualised.to_daily(annual), 0.01, epsilon = 1e-15);
    }

    #[test]
    fn test_volatility_basis_parse() {
        assert_eq!("annualized".parse::<VolatilityBasis>(), Ok(VolatilityBasis::Annualised));
        assert_eq!("DAILY".parse::<VolatilityBasis>(), Ok(VolatilityBasis::Daily));
        assert!("weekly".parse::<VolatilityBasis>().is_err());
    }
}
