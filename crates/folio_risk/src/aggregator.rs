//! Consolidated portfolio view.
//!
//! Combines the session state with an upstream risk payload into the view
//! model a caller renders: metric cards, per-asset rows with a coarse risk
//! level, the current value and its change since the previous view.

use crate::session::PortfolioSnapshot;
use crate::upstream::RiskResponse;
use folio_core::{
    rolling_risk, AnalyticsSeries, ProjectionBand, RiskMetrics, RollingPoint, RollingWindow,
    Ticker, VolatilityBasis,
};
use serde::Serialize;
use std::fmt;

/// VaR above which an asset is high risk.
pub const HIGH_RISK_VAR: f64 = 0.10;

/// VaR above which an asset is medium risk.
pub const MEDIUM_RISK_VAR: f64 = 0.05;

/// Coarse risk classification derived from VaR.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// VaR at or below 5%.
    Low,
    /// VaR above 5% and at or below 10%.
    Medium,
    /// VaR above 10%.
    High,
}

impl RiskLevel {
    /// Classifies a VaR loss fraction. Both thresholds are exclusive.
    pub fn from_var(var: f64) -> Self {
        if var > HIGH_RISK_VAR {
            Self::High
        } else if var > MEDIUM_RISK_VAR {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Portfolio-level metric cards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricCards {
    /// Beta against the market.
    pub beta: Option<f64>,
    /// Daily volatility.
    pub daily_volatility: Option<f64>,
    /// Annualised volatility.
    pub annualised_volatility: Option<f64>,
    /// Sharpe ratio.
    pub sharpe: f64,
    /// Maximum drawdown as a loss fraction.
    pub max_drawdown: f64,
    /// VaR as a loss fraction.
    pub var: f64,
    /// Expected shortfall as a loss fraction.
    pub es: f64,
    /// Best single-day return.
    pub best_day: Option<f64>,
    /// Worst single-day return.
    pub worst_day: Option<f64>,
    /// Risk level of the portfolio as a whole.
    pub risk_level: RiskLevel,
}

impl MetricCards {
    /// Builds the cards from portfolio metrics and optional analytics.
    pub fn from_payload(
        metrics: &RiskMetrics,
        analytics: Option<&AnalyticsSeries>,
        basis: VolatilityBasis,
    ) -> Self {
        Self {
            beta: metrics.beta,
            daily_volatility: metrics.volatility.map(|v| basis.to_daily(v)),
            annualised_volatility: metrics.volatility.map(|v| basis.to_annualised(v)),
            sharpe: metrics.sharpe,
            max_drawdown: metrics.max_drawdown,
            var: metrics.var,
            es: metrics.es,
            best_day: analytics.map(|a| a.best_day),
            worst_day: analytics.map(|a| a.worst_day),
            risk_level: RiskLevel::from_var(metrics.var),
        }
    }
}

/// One held asset in the consolidated view.
///
/// `metrics` and `risk_level` are `None` when the upstream payload has no
/// entry for the ticker; the row is then shown as data not available.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetView {
    /// Asset ticker.
    pub ticker: Ticker,
    /// Normalised weight in percent.
    pub weight_pct: f64,
    /// Upstream risk metrics.
    pub metrics: Option<RiskMetrics>,
    /// Risk level derived from VaR.
    pub risk_level: Option<RiskLevel>,
    /// Most recent cumulative return, as a fraction.
    pub latest_return: Option<f64>,
}

impl AssetView {
    /// Whether upstream risk data exists for this asset.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.metrics.is_some()
    }
}

/// Current value and its change.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValueSummary {
    /// Current portfolio value in currency units.
    pub current_value: f64,
    /// Value of the previous view, if any.
    pub previous_value: Option<f64>,
    /// `current - previous`, zero for the first view.
    pub change: f64,
    /// `change / previous`, when the previous value is non-zero.
    pub change_pct: Option<f64>,
    /// Upstream day-over-day return in percent.
    pub reported_change_pct: Option<f64>,
    /// `current_value × reported_change_pct / 100`.
    pub reported_change: Option<f64>,
}

/// The consolidated portfolio view model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConsolidatedView {
    /// Value and change.
    pub value: ValueSummary,
    /// Portfolio metric cards, when the payload has portfolio metrics.
    pub portfolio: Option<MetricCards>,
    /// One row per held asset, in ticker order.
    pub assets: Vec<AssetView>,
    /// Cash share in percent.
    pub cash_pct: f64,
    /// Rolling volatility of the portfolio cumulative returns.
    pub rolling_volatility: Vec<RollingPoint>,
    /// Forward value projection, when one was built.
    pub projection: Option<ProjectionBand>,
}

impl ConsolidatedView {
    /// Attaches a forward projection.
    pub fn with_projection(mut self, projection: Option<ProjectionBand>) -> Self {
        self.projection = projection;
        self
    }

    /// Number of assets without upstream data.
    pub fn unavailable_count(&self) -> usize {
        self.assets.iter().filter(|a| !a.is_available()).count()
    }
}

/// Builds consolidated views and remembers the last value it reported.
#[derive(Clone, Debug, Default)]
pub struct MetricsAggregator {
    basis: VolatilityBasis,
    window: RollingWindow,
    previous_value: Option<f64>,
}

impl MetricsAggregator {
    /// Creates an aggregator with no previous value.
    pub fn new(basis: VolatilityBasis, window: RollingWindow) -> Self {
        Self {
            basis,
            window,
            previous_value: None,
        }
    }

    /// Volatility basis applied to upstream figures.
    #[inline]
    pub fn basis(&self) -> VolatilityBasis {
        self.basis
    }

    /// Value reported by the last view.
    #[inline]
    pub fn previous_value(&self) -> Option<f64> {
        self.previous_value
    }

    /// Current value of the portfolio.
    ///
    /// Sums each held asset's latest cumulative return weighted by its
    /// percentage, then `initial_capital × (1 + weighted_return) + cash`.
    /// Assets without analytics contribute nothing.
    pub fn current_value(snapshot: &PortfolioSnapshot, payload: Option<&RiskResponse>) -> f64 {
        let weighted_return = payload.map_or(0.0, |payload| {
            snapshot
                .weights()
                .assets()
                .iter()
                .filter_map(|(ticker, pct)| {
                    payload
                        .assets_analytics
                        .get(ticker)
                        .and_then(AnalyticsSeries::latest_cumulative_return)
                        .map(|ret| ret * pct / 100.0)
                })
                .sum()
        });
        snapshot.initial_capital() * (1.0 + weighted_return) + snapshot.cash_balance()
    }

    /// Builds the consolidated view and records its value as the previous one.
    pub fn aggregate(
        &mut self,
        snapshot: &PortfolioSnapshot,
        payload: Option<&RiskResponse>,
    ) -> ConsolidatedView {
        let current_value = Self::current_value(snapshot, payload);
        let value = self.summarise(current_value, payload);

        let assets: Vec<AssetView> = snapshot
            .weights()
            .assets()
            .iter()
            .map(|(ticker, &weight_pct)| {
                let metrics = payload.and_then(|p| p.assets.get(ticker)).cloned();
                let latest_return = payload
                    .and_then(|p| p.assets_analytics.get(ticker))
                    .and_then(AnalyticsSeries::latest_cumulative_return);
                AssetView {
                    ticker: ticker.clone(),
                    weight_pct,
                    risk_level: metrics.as_ref().map(|m| RiskLevel::from_var(m.var)),
                    metrics,
                    latest_return,
                }
            })
            .collect();

        let portfolio_analytics = payload.and_then(|p| p.portfolio_analytics.as_ref());
        let portfolio = payload
            .and_then(|p| p.portfolio.as_ref())
            .map(|metrics| MetricCards::from_payload(metrics, portfolio_analytics, self.basis));
        let rolling_volatility = portfolio_analytics
            .map(|series| rolling_risk(series, &self.window))
            .unwrap_or_default();

        let view = ConsolidatedView {
            value,
            portfolio,
            assets,
            cash_pct: snapshot.weights().cash_pct(),
            rolling_volatility,
            projection: None,
        };

        let missing = view.unavailable_count();
        if missing > 0 {
            tracing::warn!(missing, "assets without upstream risk data");
        }
        view
    }

    fn summarise(&mut self, current_value: f64, payload: Option<&RiskResponse>) -> ValueSummary {
        let previous_value = self.previous_value.replace(current_value);
        let change = previous_value.map_or(0.0, |prev| current_value - prev);
        let change_pct = previous_value
            .filter(|&prev| prev != 0.0)
            .map(|prev| change / prev);
        let reported_change_pct = payload
            .and_then(|p| p.today_change.as_ref())
            .map(|t| t.change_pct);

        ValueSummary {
            current_value,
            previous_value,
            change,
            change_pct,
            reported_change_pct,
            reported_change: reported_change_pct.map(|pct| current_value * pct / 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PortfolioSession;
    use approx::assert_relative_eq;
    use folio_core::TodayChange;

    fn snapshot() -> PortfolioSnapshot {
        let mut session = PortfolioSession::new(100_000.0).unwrap();
        session
            .replace_weights([("AAPL", 60.0), ("GOOG", 40.0)], 0.0)
            .unwrap();
        session.snapshot()
    }

    fn metrics(var: f64) -> RiskMetrics {
        RiskMetrics {
            var,
            es: var * 1.3,
            sharpe: 1.0,
            max_drawdown: 0.2,
            volatility: Some(0.252_f64.sqrt() * 0.1),
            beta: Some(1.1),
        }
    }

    fn payload() -> RiskResponse {
        let mut response = RiskResponse {
            portfolio: Some(metrics(0.07)),
            portfolio_analytics: Some(AnalyticsSeries::from_cumulative(
                (0..30).map(|i| (format!("d{i}"), 0.001 * i as f64)),
            )),
            today_change: Some(TodayChange {
                change_pct: 1.5,
                change_abs: None,
            }),
            ..RiskResponse::default()
        };
        response.assets.insert(Ticker::new("AAPL"), metrics(0.12));
        response.assets_analytics.insert(
            Ticker::new("AAPL"),
            AnalyticsSeries::from_cumulative([("d0", 0.0), ("d1", 0.10)]),
        );
        response
    }

    #[test]
    fn test_risk_level_thresholds_exclusive() {
        assert_eq!(RiskLevel::from_var(0.05), RiskLevel::Low);
        assert_eq!(RiskLevel::from_var(0.0500001), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_var(0.10), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_var(0.1000001), RiskLevel::High);
        assert_eq!(RiskLevel::High.to_string(), "High");
    }

    #[test]
    fn test_current_value_without_payload() {
        let mut session = PortfolioSession::new(100_000.0).unwrap();
        session.replace_weights([("AAPL", 1.0)], 2_500.0).unwrap();
        let value = MetricsAggregator::current_value(&session.snapshot(), None);
        assert_relative_eq!(value, 102_500.0);
    }

    #[test]
    fn test_current_value_weights_latest_returns() {
        // AAPL at 60% returned 10%; GOOG has no analytics.
        let value = MetricsAggregator::current_value(&snapshot(), Some(&payload()));
        assert_relative_eq!(value, 106_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_aggregate_marks_missing_assets() {
        let mut aggregator = MetricsAggregator::default();
        let view = aggregator.aggregate(&snapshot(), Some(&payload()));

        assert_eq!(view.assets.len(), 2);
        let aapl = &view.assets[0];
        assert_eq!(aapl.ticker.as_str(), "AAPL");
        assert!(aapl.is_available());
        assert_eq!(aapl.risk_level, Some(RiskLevel::High));
        assert_eq!(aapl.latest_return, Some(0.10));

        let goog = &view.assets[1];
        assert!(!goog.is_available());
        assert_eq!(goog.risk_level, None);
        assert_eq!(view.unavailable_count(), 1);
    }

    #[test]
    fn test_aggregate_portfolio_cards() {
        let mut aggregator = MetricsAggregator::default();
        let view = aggregator.aggregate(&snapshot(), Some(&payload()));
        let cards = view.portfolio.expect("cards");

        assert_eq!(cards.risk_level, RiskLevel::Medium);
        assert_eq!(cards.beta, Some(1.1));
        let expected = 0.252_f64.sqrt() * 0.1 / 252_f64.sqrt();
        assert_relative_eq!(cards.daily_volatility.unwrap(), expected);
        assert_eq!(cards.best_day, Some(0.0));
        assert_eq!(view.rolling_volatility.len(), 10);
        assert!(view.projection.is_none());
    }

    #[test]
    fn test_change_uses_previous_view() {
        let mut aggregator = MetricsAggregator::default();
        let first = aggregator.aggregate(&snapshot(), None);
        assert_eq!(first.value.previous_value, None);
        assert_eq!(first.value.change, 0.0);
        assert_eq!(first.value.change_pct, None);

        let second = aggregator.aggregate(&snapshot(), Some(&payload()));
        assert_eq!(second.value.previous_value, Some(100_000.0));
        assert_relative_eq!(second.value.change, 6_000.0, epsilon = 1e-6);
        assert_relative_eq!(second.value.change_pct.unwrap(), 0.06, epsilon = 1e-9);
        assert_eq!(aggregator.previous_value(), Some(second.value.current_value));
    }

    #[test]
    fn test_reported_change() {
        let mut aggregator = MetricsAggregator::default();
        let view = aggregator.aggregate(&snapshot(), Some(&payload()));
        assert_eq!(view.value.reported_change_pct, Some(1.5));
        assert_relative_eq!(view.value.reported_change.unwrap(), 106_000.0 * 0.015, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_payload_never_fails() {
        let mut aggregator = MetricsAggregator::default();
        let view = aggregator.aggregate(&snapshot(), Some(&RiskResponse::default()));
        assert!(view.portfolio.is_none());
        assert!(view.rolling_volatility.is_empty());
        assert_eq!(view.unavailable_count(), 2);
        assert_relative_eq!(view.value.current_value, 100_000.0);
    }
}
