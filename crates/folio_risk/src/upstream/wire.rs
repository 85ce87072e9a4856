//! Request and response payloads exchanged with upstream services.
//!
//! Field names match the upstream JSON exactly: snake_case for the risk
//! service, camelCase for the scenario service.

use folio_core::{AnalyticsSeries, ProjectionBand, RiskMetrics, Ticker, TodayChange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request to the upstream risk service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskRequest {
    /// Tickers in request order, `CASH` last when present.
    pub tickers: Vec<Ticker>,
    /// Weights as fractions in `0..=1`, aligned with `tickers`.
    pub weights: Vec<f64>,
    /// Portfolio value in currency units.
    pub portfolio_value: f64,
}

/// Response from the upstream risk service.
///
/// Every field is optional on the wire so a partial payload still decodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskResponse {
    /// Portfolio-level risk metrics.
    #[serde(default)]
    pub portfolio: Option<RiskMetrics>,
    /// Portfolio-level analytics series.
    #[serde(default)]
    pub portfolio_analytics: Option<AnalyticsSeries>,
    /// Per-asset risk metrics.
    #[serde(default)]
    pub assets: BTreeMap<Ticker, RiskMetrics>,
    /// Per-asset analytics series.
    #[serde(default)]
    pub assets_analytics: BTreeMap<Ticker, AnalyticsSeries>,
    /// Upstream day-over-day change.
    #[serde(default)]
    pub today_change: Option<TodayChange>,
}

impl RiskResponse {
    /// Decodes a response from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Whether the payload carries no risk data at all.
    pub fn is_empty(&self) -> bool {
        self.portfolio.is_none()
            && self.portfolio_analytics.is_none()
            && self.assets.is_empty()
            && self.assets_analytics.is_empty()
    }
}

/// Request to the upstream scenario service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    /// Scenario identifier, e.g. `market-crash`.
    pub scenario_id: String,
    /// Held tickers with weights as fractions in `0..=1`.
    pub portfolio: BTreeMap<Ticker, f64>,
    /// Portfolio value in currency units.
    pub portfolio_value: f64,
}

/// Unweighted scenario impact of one asset, in percent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioImpact {
    /// Asset ticker.
    pub asset: Ticker,
    /// Impact in percent.
    pub impact: f64,
}

/// Response from the upstream scenario service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResponse {
    /// Per-asset impact for every asset the service covers.
    #[serde(default)]
    pub scenario_results: Vec<ScenarioImpact>,
    /// Impact of each held asset scaled by its weight, in percent.
    #[serde(default)]
    pub asset_impact: BTreeMap<Ticker, f64>,
    /// Expected loss in currency units.
    #[serde(default)]
    pub expected_loss: f64,
    /// Expected loss in percent of the portfolio value.
    #[serde(default)]
    pub expected_loss_pct: f64,
    /// Median worst drawdown in percent (negative).
    #[serde(default)]
    pub max_drawdown: f64,
    /// 5% quantile of terminal returns in percent.
    #[serde(rename = "VaR95", default)]
    pub var_95: f64,
    /// Estimated recovery time in months.
    #[serde(default)]
    pub recovery_time_months: f64,
    /// Baseline projection band under the scenario.
    #[serde(default)]
    pub projection: ProjectionBand,
}
