//! In-process factor-model scenario evaluator.
//!
//! Each asset carries a beta vector over seven macro factors and each
//! scenario a shock vector over the same factors. Asset impact is their dot
//! product. Portfolio statistics come from a GBM simulation whose drift and
//! volatility are shifted by the scenario's market and rates shocks.

use super::catalog::ScenarioKind;
use crate::upstream::{
    ScenarioImpact, ScenarioRequest, ScenarioResponse, ScenarioService, UpstreamError,
};
use async_trait::async_trait;
use folio_core::Ticker;
use folio_projection::mc::{
    band_from_paths, GbmParams, PathStatistics, PortfolioValueProjector, ProjectionConfig,
    RecoveryModel,
};
use folio_projection::rng::{splitmix64, ProjectionRng};
use std::collections::BTreeMap;

/// Macro factors in vector order.
pub const FACTORS: [&str; 7] = [
    "market",
    "rates",
    "inflation",
    "growth",
    "liquidity",
    "tech",
    "risk_on",
];

/// Exposure or shock over [`FACTORS`].
pub type FactorVector = [f64; 7];

const ZERO: FactorVector = [0.0; 7];

const ASSET_BETAS: &[(&str, FactorVector)] = &[
    ("AAPL", [1.2, 0.8, -0.3, -0.2, 0.6, 1.1, 0.4]),
    ("GOOG", [1.1, 0.7, -0.2, -0.1, 0.5, 1.0, 0.3]),
    ("TSLA", [1.6, 1.2, -0.1, -0.1, 0.7, 1.5, 0.6]),
    ("AMZN", [1.3, 0.9, -0.2, -0.2, 0.6, 1.2, 0.4]),
    ("VOO", [1.0, 0.6, -0.1, 0.0, 0.3, 0.9, 0.2]),
    ("SPY", [1.0, 0.6, -0.1, 0.0, 0.3, 0.9, 0.2]),
    ("BND", [0.1, -0.05, 0.2, 0.1, 0.0, 0.0, 0.0]),
    ("AGG", [0.1, -0.03, 0.15, 0.05, 0.0, 0.0, 0.0]),
    ("TLT", [0.0, -0.02, 0.2, 0.1, 0.0, 0.0, 0.0]),
    ("VTIVX", [0.0, -0.01, 0.1, 0.05, 0.0, 0.0, 0.0]),
    ("VXUS", [0.9, 0.5, -0.1, 0.0, 0.4, 0.8, 0.1]),
    ("GLD", [0.0, 0.0, 1.3, 0.5, 0.0, 0.0, 0.0]),
    ("SLV", [0.0, 0.0, 1.1, 0.4, 0.0, 0.0, 0.0]),
    ("USO", [0.0, 0.0, 0.9, 0.3, 0.0, 0.0, 0.0]),
    ("DBC", [0.1, 0.0, 1.0, 0.3, 0.0, 0.0, 0.0]),
    ("CASH", ZERO),
    ("USD", ZERO),
    ("BTC", [2.0, 1.8, 0.0, 0.1, 0.2, 1.3, 0.8]),
    ("ETH", [2.2, 1.7, 0.0, 0.2, 0.3, 1.4, 0.7]),
    ("SOL", [2.5, 1.9, 0.1, 0.3, 0.4, 1.6, 0.9]),
];

/// Factor shocks of a catalogued scenario.
pub fn factor_shocks(kind: ScenarioKind) -> FactorVector {
    match kind {
        ScenarioKind::MarketCrash => [-0.20, -0.15, 0.05, 0.02, -0.05, 0.10, 0.0],
        ScenarioKind::TechBoom => [0.10, 0.25, -0.05, 0.01, 0.05, -0.08, -0.02],
        ScenarioKind::InflationSpike => [-0.08, -0.10, 0.35, 0.25, 0.10, 0.12, -0.05],
        ScenarioKind::Recession => [-0.15, -0.10, -0.05, -0.10, -0.15, 0.20, 0.02],
        ScenarioKind::BullMarket => [0.18, 0.20, -0.02, 0.01, 0.10, -0.08, -0.05],
    }
}

/// Factor exposure of `ticker`, if covered.
pub fn asset_beta(ticker: &str) -> Option<FactorVector> {
    ASSET_BETAS
        .iter()
        .find(|(symbol, _)| *symbol == ticker)
        .map(|(_, beta)| *beta)
}

fn dot(a: &FactorVector, b: &FactorVector) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Stable 64-bit FNV-1a hash of a scenario id, used as its simulation seed.
pub fn scenario_seed(scenario_id: &str) -> u64 {
    scenario_id
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
        })
}

const RECOVERY_STREAM: u64 = 0x5245_434f_5645_5259;

/// Scenario service evaluating stresses with the factor model.
#[derive(Clone, Debug)]
pub struct FactorModelEvaluator {
    path_count: usize,
    horizon_days: usize,
    projection_days: usize,
    base_drift: f64,
    base_volatility: f64,
}

impl Default for FactorModelEvaluator {
    fn default() -> Self {
        Self {
            path_count: 5_000,
            horizon_days: 365,
            projection_days: 90,
            base_drift: 0.08,
            base_volatility: 0.15,
        }
    }
}

impl FactorModelEvaluator {
    /// Evaluator with 5000 paths over 365 trading days.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of simulated paths.
    pub fn with_path_count(mut self, path_count: usize) -> Self {
        self.path_count = path_count;
        self
    }

    /// Number of simulated paths.
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Annual drift and volatility under `shocks`.
    pub fn adjusted_params(&self, shocks: &FactorVector) -> (f64, f64) {
        (
            self.base_drift + shocks[0],
            self.base_volatility * (1.0 + shocks[1]),
        )
    }

    /// Evaluates a scenario on the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Unavailable`] when the path count is outside
    /// the projector's bounds.
    pub fn evaluate_blocking(
        &self,
        request: &ScenarioRequest,
    ) -> Result<ScenarioResponse, UpstreamError> {
        let kind = ScenarioKind::from_id(&request.scenario_id);
        let shocks = kind.map_or(ZERO, factor_shocks);

        let scenario_results = ASSET_BETAS
            .iter()
            .map(|(symbol, beta)| ScenarioImpact {
                asset: Ticker::new(symbol),
                impact: round_to(dot(beta, &shocks) * 100.0, 2),
            })
            .collect();
        let asset_impact: BTreeMap<Ticker, f64> = request
            .portfolio
            .iter()
            .filter_map(|(ticker, fraction)| {
                let beta = asset_beta(ticker.as_str())?;
                let impact = round_to(dot(&beta, &shocks) * fraction * 100.0, 2);
                Some((ticker.clone(), impact))
            })
            .collect();

        let mut response = ScenarioResponse {
            scenario_results,
            asset_impact,
            ..ScenarioResponse::default()
        };

        let value = request.portfolio_value;
        if value.is_nan() || value <= 0.0 {
            tracing::debug!(value, "non-positive portfolio value, skipping simulation");
            return Ok(response);
        }

        let seed = scenario_seed(&request.scenario_id);
        let config = ProjectionConfig::builder()
            .path_count(self.path_count)
            .seed(seed)
            .build()
            .map_err(|err| UpstreamError::Unavailable(err.to_string()))?;
        let (drift, volatility) = self.adjusted_params(&shocks);
        let projector = PortfolioValueProjector::new(config);
        let params = GbmParams::annual(value, drift, volatility);
        let paths = projector.simulate_paths(params, self.horizon_days);

        let Some(stats) = PathStatistics::compute(&paths, value) else {
            return Ok(response);
        };

        let model = RecoveryModel::for_severity(value, stats.severity_quantile(0.75));
        let mut recovery_rng = ProjectionRng::from_seed(splitmix64(seed ^ RECOVERY_STREAM));
        let recovery_months =
            model.recovery_months(stats.median_trough(), paths.path_count(), &mut recovery_rng);

        response.expected_loss = stats.expected_loss.round();
        response.expected_loss_pct = round_to(stats.expected_loss / value * 100.0, 2);
        response.max_drawdown = round_to(stats.max_drawdown * 100.0, 2);
        response.var_95 = round_to(stats.var_95 * 100.0, 2);
        response.recovery_time_months = recovery_months;
        response.projection = band_from_paths(&paths).truncated(self.projection_days);

        tracing::info!(
            scenario_id = %request.scenario_id,
            known = kind.is_some(),
            expected_loss = response.expected_loss,
            var_95 = response.var_95,
            recovery_time_months = response.recovery_time_months,
            "scenario evaluated"
        );
        Ok(response)
    }
}

#[async_trait]
impl ScenarioService for FactorModelEvaluator {
    async fn evaluate(&self, request: &ScenarioRequest) -> Result<ScenarioResponse, UpstreamError> {
        let evaluator = self.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || evaluator.evaluate_blocking(&request))
            .await
            .map_err(|err| UpstreamError::Unavailable(format!("scenario worker failed: {err}")))?
    }
}
