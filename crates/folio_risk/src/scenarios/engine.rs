//! Scenario execution engine.
//!
//! Shapes the request for the scenario service, then filters and validates
//! what comes back. Loss, VaR, drawdown and recovery figures pass through
//! from the service unchanged apart from sanitising.

use super::catalog::ScenarioKind;
use crate::upstream::{ScenarioImpact, ScenarioRequest, ScenarioResponse, ScenarioService};
use folio_core::{PortfolioWeights, ProjectionBand, Ticker};
use serde::Serialize;
use std::collections::BTreeMap;

/// Scenario view model produced fresh per run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    /// Scenario identifier as requested.
    pub scenario_id: String,
    /// Headline impact in percent; 0 for unknown ids.
    pub headline_impact_pct: f64,
    /// Unweighted impact of each held asset, in percent.
    pub per_asset_impact_pct: BTreeMap<Ticker, f64>,
    /// Expected loss in currency units.
    pub expected_loss_absolute: f64,
    /// Expected loss in percent.
    pub expected_loss_pct: f64,
    /// Median worst drawdown in percent.
    pub max_drawdown_pct: f64,
    /// VaR(95) of terminal returns in percent.
    pub var_95_pct: f64,
    /// Estimated recovery time in months.
    pub recovery_time_months: f64,
    /// Baseline projection band.
    pub projection: ProjectionBand,
    /// Baseline median scaled by the headline impact.
    pub scenario_line: Vec<f64>,
}

impl ScenarioResult {
    /// Result for a run without any upstream evaluation.
    pub fn neutral(scenario_id: &str) -> Self {
        Self {
            scenario_id: scenario_id.to_string(),
            headline_impact_pct: headline_impact(scenario_id),
            per_asset_impact_pct: BTreeMap::new(),
            expected_loss_absolute: 0.0,
            expected_loss_pct: 0.0,
            max_drawdown_pct: 0.0,
            var_95_pct: 0.0,
            recovery_time_months: 0.0,
            projection: ProjectionBand::empty(),
            scenario_line: Vec::new(),
        }
    }
}

fn finite_or_zero(name: &'static str, value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!(field = name, "non-finite scenario statistic replaced with 0");
        0.0
    }
}

/// Headline impact in percent; unknown ids are neutral.
pub fn headline_impact(scenario_id: &str) -> f64 {
    ScenarioKind::from_id(scenario_id).map_or(0.0, |kind| kind.headline_impact_pct())
}

/// `baseline[t] × (1 + headline / 100)` for every offset.
pub fn scenario_line(baseline: &[f64], headline_impact_pct: f64) -> Vec<f64> {
    let factor = 1.0 + headline_impact_pct / 100.0;
    baseline.iter().map(|v| v * factor).collect()
}

/// Shapes the scenario request: held tickers with weights as fractions.
pub fn shape_request(
    scenario_id: &str,
    weights: &PortfolioWeights,
    portfolio_value: f64,
) -> ScenarioRequest {
    let (tickers, fractions) = weights.weight_fractions();
    ScenarioRequest {
        scenario_id: scenario_id.to_string(),
        portfolio: tickers.into_iter().zip(fractions).collect(),
        portfolio_value,
    }
}

/// Builds the result from an optional service response.
///
/// Per-asset impacts are kept only for held tickers. Non-finite statistics
/// become 0 and a ragged projection band becomes empty.
pub fn interpret(
    scenario_id: &str,
    weights: &PortfolioWeights,
    response: Option<ScenarioResponse>,
) -> ScenarioResult {
    let Some(response) = response else {
        return ScenarioResult::neutral(scenario_id);
    };

    let total = response.scenario_results.len();
    let per_asset_impact_pct: BTreeMap<Ticker, f64> = response
        .scenario_results
        .into_iter()
        .filter(|ScenarioImpact { asset, .. }| weights.holds(asset.as_str()))
        .map(|ScenarioImpact { asset, impact }| (asset, finite_or_zero("impact", impact)))
        .collect();
    tracing::debug!(
        scenario_id,
        kept = per_asset_impact_pct.len(),
        dropped = total - per_asset_impact_pct.len(),
        "filtered scenario impacts to held tickers"
    );

    let projection = if response.projection.is_consistent() {
        response.projection
    } else {
        tracing::warn!(scenario_id, "ragged scenario projection discarded");
        ProjectionBand::empty()
    };

    let headline_impact_pct = headline_impact(scenario_id);
    let scenario_line = scenario_line(&projection.median, headline_impact_pct);

    ScenarioResult {
        scenario_id: scenario_id.to_string(),
        headline_impact_pct,
        per_asset_impact_pct,
        expected_loss_absolute: finite_or_zero("expectedLoss", response.expected_loss),
        expected_loss_pct: finite_or_zero("expectedLossPct", response.expected_loss_pct),
        max_drawdown_pct: finite_or_zero("maxDrawdown", response.max_drawdown),
        var_95_pct: finite_or_zero("VaR95", response.var_95),
        recovery_time_months: finite_or_zero("recoveryTimeMonths", response.recovery_time_months),
        projection,
        scenario_line,
    }
}

/// Runs stress scenarios against a scenario service.
#[derive(Clone, Debug, Default)]
pub struct ScenarioEngine<S> {
    service: S,
}

impl<S> ScenarioEngine<S> {
    /// Creates an engine backed by `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Backing service.
    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S: ScenarioService> ScenarioEngine<S> {
    /// Runs `scenario_id` for the portfolio.
    ///
    /// A failed service call is logged and yields the neutral result.
    pub async fn run_scenario(
        &self,
        scenario_id: &str,
        weights: &PortfolioWeights,
        portfolio_value: f64,
    ) -> ScenarioResult {
        if ScenarioKind::from_id(scenario_id).is_none() {
            tracing::info!(scenario_id, "unknown scenario, headline impact is neutral");
        }
        let request = shape_request(scenario_id, weights, portfolio_value);
        let response = match self.service.evaluate(&request).await {
            Ok(response) => Some(response),
            Err(err) => {
                tracing::warn!(scenario_id, error = %err, "scenario evaluation failed");
                None
            }
        };
        interpret(scenario_id, weights, response)
    }
}
