//! Integration tests for folio_risk.
//!
//! Drives the session, refresh coordinator and scenario engine together
//! against in-process collaborators.

use approx::assert_relative_eq;
use async_trait::async_trait;
use folio_core::{RiskMetrics, VolatilityBasis};
use folio_risk::scenarios::{scenario_line, FactorModelEvaluator};
use folio_risk::{
    PortfolioSession, RefreshCoordinator, RefreshOutcome, RefreshSettings, RiskDataSource,
    RiskRequest, RiskResponse, ScenarioEngine, ScenarioRequest, ScenarioResponse, ScenarioService,
    StaticRiskSource, UpstreamError,
};
use std::sync::Arc;

fn session() -> PortfolioSession {
    let mut session = PortfolioSession::new(100_000.0).expect("valid capital");
    session
        .replace_weights([("AAPL", 60.0), ("GOOG", 40.0)], 0.0)
        .expect("valid weights");
    session
}

fn daily_payload(volatility: f64) -> RiskResponse {
    RiskResponse {
        portfolio: Some(RiskMetrics {
            var: 0.032,
            es: 0.041,
            sharpe: 0.9,
            max_drawdown: 0.18,
            volatility: Some(volatility),
            beta: Some(1.1),
        }),
        ..RiskResponse::default()
    }
}

// =============================================================================
// Refresh pipeline
// =============================================================================

#[tokio::test]
async fn test_end_to_end_view_projection() {
    let settings = RefreshSettings {
        volatility_basis: VolatilityBasis::Daily,
        ..RefreshSettings::default()
    };
    let coordinator =
        RefreshCoordinator::new(Arc::new(StaticRiskSource::new(daily_payload(0.02))), settings);

    let outcome = coordinator.refresh(session().snapshot()).await;
    assert!(matches!(outcome, RefreshOutcome::Applied(_)));

    let view = coordinator.latest_view().expect("published view");
    let band = view.projection.as_ref().expect("projection");
    assert_eq!(band.len(), 31);
    assert_eq!(band.median[0], 100_000.0);
    assert!(band.median[30] > 97_000.0 && band.median[30] < 105_000.0);
    assert!(band.p10[30] < band.median[30] && band.median[30] < band.p90[30]);

    let cards = view.portfolio.as_ref().expect("metric cards");
    assert_relative_eq!(cards.daily_volatility.unwrap(), 0.02);
}

#[tokio::test]
async fn test_request_carries_fraction_weights() {
    struct Recording;

    #[async_trait]
    impl RiskDataSource for Recording {
        async fn fetch_risk(&self, request: &RiskRequest) -> Result<RiskResponse, UpstreamError> {
            assert_eq!(request.tickers.len(), 2);
            assert_relative_eq!(request.weights.iter().sum::<f64>(), 1.0);
            assert_eq!(request.portfolio_value, 100_000.0);
            Ok(RiskResponse::default())
        }
    }

    let coordinator = RefreshCoordinator::new(Arc::new(Recording), RefreshSettings::default());
    let outcome = coordinator.refresh(session().snapshot()).await;
    assert!(matches!(outcome, RefreshOutcome::Applied(_)));
    assert!(coordinator.latest_view().unwrap().projection.is_none());
}

#[tokio::test]
async fn test_latest_of_many_refreshes_wins() {
    let coordinator = RefreshCoordinator::new(
        Arc::new(StaticRiskSource::new(RiskResponse::default())),
        RefreshSettings::default(),
    );

    let mut handles = Vec::new();
    for capital in [10_000.0, 20_000.0, 30_000.0, 40_000.0] {
        let mut session = session();
        session.set_initial_capital(capital).unwrap();
        handles.push(coordinator.spawn_refresh(session.snapshot()));
    }

    let mut applied = 0;
    for handle in handles {
        if matches!(handle.await.unwrap(), RefreshOutcome::Applied(_)) {
            applied += 1;
        }
    }
    assert!(applied >= 1);
    assert_eq!(coordinator.latest_view().unwrap().value.current_value, 40_000.0);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_market_crash_line_scales_baseline() {
    let line = scenario_line(&[100.0, 110.0], -15.2);
    assert_relative_eq!(line[0], 84.8, epsilon = 1e-9);
    assert_relative_eq!(line[1], 93.28, epsilon = 1e-9);
}

#[tokio::test]
async fn test_factor_model_scenario_run() {
    let engine = ScenarioEngine::new(FactorModelEvaluator::new().with_path_count(500));
    let session = session();
    let result = engine
        .run_scenario("market-crash", session.weights(), 100_000.0)
        .await;

    assert_eq!(result.headline_impact_pct, -15.2);
    assert_eq!(result.per_asset_impact_pct.len(), 2);
    assert!(result.per_asset_impact_pct.values().all(|impact| *impact < 0.0));
    assert_eq!(result.projection.len(), 91);
    assert_eq!(result.scenario_line.len(), 91);
    assert_relative_eq!(
        result.scenario_line[0],
        result.projection.median[0] * 0.848,
        epsilon = 1e-6
    );
    assert!(result.recovery_time_months >= 0.0);
}

#[tokio::test]
async fn test_unknown_scenario_is_neutral_headline() {
    let engine = ScenarioEngine::new(FactorModelEvaluator::new().with_path_count(200));
    let session = session();
    let result = engine.run_scenario("alien-invasion", session.weights(), 50_000.0).await;

    assert_eq!(result.headline_impact_pct, 0.0);
    assert!(result.per_asset_impact_pct.values().all(|impact| *impact == 0.0));
    assert_eq!(result.scenario_line, result.projection.median);
}

#[tokio::test]
async fn test_failing_service_yields_neutral_result() {
    struct Offline;

    #[async_trait]
    impl ScenarioService for Offline {
        async fn evaluate(&self, _: &ScenarioRequest) -> Result<ScenarioResponse, UpstreamError> {
            Err(UpstreamError::Unavailable("scenario service down".to_string()))
        }
    }

    let engine = ScenarioEngine::new(Offline);
    let session = session();
    let result = engine.run_scenario("recession", session.weights(), 100_000.0).await;

    assert_eq!(result.headline_impact_pct, -12.7);
    assert!(result.per_asset_impact_pct.is_empty());
    assert!(result.projection.is_empty());
    assert!(result.scenario_line.is_empty());
}
