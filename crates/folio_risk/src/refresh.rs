//! Background refresh of the consolidated view.
//!
//! One refresh is: fetch the upstream payload, project the forward value on
//! the blocking pool, then aggregate and publish through the latest-slot
//! guard. A refresh that has been superseded by a newer one never touches
//! the published view or the aggregator's previous value.

use crate::aggregator::{ConsolidatedView, MetricsAggregator};
use crate::sequencing::{ApplyOutcome, LatestSlot, RequestSequencer, RequestTicket};
use crate::session::PortfolioSnapshot;
use crate::upstream::{RiskDataSource, RiskResponse};
use folio_core::{ProjectionBand, RollingWindow, VolatilityBasis};
use folio_projection::mc::{GbmParams, PortfolioValueProjector, ProjectionConfig};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Default projection horizon shown with the view, in days.
pub const DEFAULT_VIEW_HORIZON_DAYS: usize = 30;

/// Default expected daily return of the view projection.
pub const DEFAULT_DAILY_DRIFT: f64 = 0.0005;

/// Settings of the refresh pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct RefreshSettings {
    /// Projection horizon in days.
    pub horizon_days: usize,
    /// Expected daily return fed to the projector.
    pub daily_drift: f64,
    /// Time basis of upstream volatility.
    pub volatility_basis: VolatilityBasis,
    /// Rolling volatility window.
    pub rolling_window: RollingWindow,
    /// Projector configuration.
    pub projection: ProjectionConfig,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_VIEW_HORIZON_DAYS,
            daily_drift: DEFAULT_DAILY_DRIFT,
            volatility_basis: VolatilityBasis::default(),
            rolling_window: RollingWindow::default(),
            projection: ProjectionConfig::default(),
        }
    }
}

/// How a refresh ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The view was published.
    Applied(RequestTicket),
    /// A newer refresh was requested first; the result was discarded.
    Superseded {
        /// Ticket of this refresh.
        ticket: RequestTicket,
        /// Newest issued ticket.
        latest: Option<RequestTicket>,
    },
    /// The refresh task itself failed.
    Aborted,
}

impl From<ApplyOutcome> for RefreshOutcome {
    fn from(outcome: ApplyOutcome) -> Self {
        match outcome {
            ApplyOutcome::Applied(ticket) => Self::Applied(ticket),
            ApplyOutcome::Stale { ticket, latest } => Self::Superseded { ticket, latest },
        }
    }
}

/// Builds the forward projection for a view, if the payload allows one.
///
/// Requires a positive seed value and a portfolio volatility.
pub fn view_projection(
    projector: &PortfolioValueProjector,
    settings: &RefreshSettings,
    seed_value: f64,
    payload: Option<&RiskResponse>,
) -> Option<ProjectionBand> {
    let volatility = payload?.portfolio.as_ref()?.volatility?;
    if seed_value.is_nan() || seed_value <= 0.0 {
        return None;
    }
    let daily_volatility = settings.volatility_basis.to_daily(volatility);
    let params = GbmParams::daily(seed_value, settings.daily_drift, daily_volatility);
    Some(projector.project(params, settings.horizon_days))
}

struct Shared {
    source: Arc<dyn RiskDataSource>,
    settings: RefreshSettings,
    projector: PortfolioValueProjector,
    view: LatestSlot<ConsolidatedView>,
    aggregator: Mutex<MetricsAggregator>,
}

/// Coordinates refreshes so that only the latest request's view is published.
///
/// Cloning is cheap; clones share the sequencer and the published view.
#[derive(Clone)]
pub struct RefreshCoordinator {
    shared: Arc<Shared>,
}

impl RefreshCoordinator {
    /// Creates a coordinator over `source`.
    pub fn new(source: Arc<dyn RiskDataSource>, settings: RefreshSettings) -> Self {
        let sequencer = Arc::new(RequestSequencer::new());
        let aggregator = MetricsAggregator::new(settings.volatility_basis, settings.rolling_window);
        Self {
            shared: Arc::new(Shared {
                source,
                projector: PortfolioValueProjector::new(settings.projection.clone()),
                settings,
                view: LatestSlot::new(sequencer),
                aggregator: Mutex::new(aggregator),
            }),
        }
    }

    /// Refresh settings.
    pub fn settings(&self) -> &RefreshSettings {
        &self.shared.settings
    }

    /// Most recently published view.
    pub fn latest_view(&self) -> Option<Arc<ConsolidatedView>> {
        self.shared.view.current()
    }

    /// Starts a refresh on the tokio runtime.
    ///
    /// The ticket is taken before this returns, so any refresh started
    /// earlier is already superseded.
    pub fn spawn_refresh(&self, snapshot: PortfolioSnapshot) -> JoinHandle<RefreshOutcome> {
        let ticket = self.shared.view.sequencer().issue();
        let this = self.clone();
        tokio::spawn(async move { this.run(ticket, snapshot).await })
    }

    /// Runs a refresh to completion on the current task.
    pub async fn refresh(&self, snapshot: PortfolioSnapshot) -> RefreshOutcome {
        let ticket = self.shared.view.sequencer().issue();
        self.run(ticket, snapshot).await
    }

    async fn run(&self, ticket: RequestTicket, snapshot: PortfolioSnapshot) -> RefreshOutcome {
        let shared = &self.shared;
        let request = snapshot.risk_request();

        let payload = match shared.source.fetch_risk(&request).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::warn!(
                    %ticket,
                    error = %err,
                    "risk fetch failed, continuing without risk data"
                );
                None
            }
        };

        let sequencer = shared.view.sequencer();
        if !sequencer.is_latest(ticket) {
            tracing::debug!(%ticket, "refresh superseded before projection");
            return RefreshOutcome::Superseded {
                ticket,
                latest: sequencer.latest(),
            };
        }

        let seed_value = MetricsAggregator::current_value(&snapshot, payload.as_ref());
        let this = self.clone();
        let projection_payload = payload.clone();
        let projection = tokio::task::spawn_blocking(move || {
            let shared = &this.shared;
            let payload = projection_payload.as_ref();
            view_projection(&shared.projector, &shared.settings, seed_value, payload)
        })
        .await;
        let projection = match projection {
            Ok(projection) => projection,
            Err(err) => {
                tracing::warn!(%ticket, error = %err, "projection worker failed");
                return RefreshOutcome::Aborted;
            }
        };

        let outcome: RefreshOutcome = shared
            .view
            .apply_with(ticket, || {
                let mut aggregator = shared
                    .aggregator
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                aggregator
                    .aggregate(&snapshot, payload.as_ref())
                    .with_projection(projection)
            })
            .into();

        match outcome {
            RefreshOutcome::Applied(_) => tracing::info!(%ticket, "view refreshed"),
            _ => tracing::debug!(%ticket, "stale refresh discarded"),
        }
        outcome
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("settings", &self.shared.settings)
            .field("view", &self.shared.view)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PortfolioSession;
    use crate::upstream::{RiskRequest, StaticRiskSource, UpstreamError};
    use async_trait::async_trait;
    use folio_core::RiskMetrics;
    use std::time::Duration;

    fn snapshot(capital: f64) -> PortfolioSnapshot {
        let mut session = PortfolioSession::new(capital).unwrap();
        session
            .replace_weights([("AAPL", 60.0), ("GOOG", 40.0)], 0.0)
            .unwrap();
        session.snapshot()
    }

    fn payload() -> RiskResponse {
        RiskResponse {
            portfolio: Some(RiskMetrics {
                var: 0.03,
                es: 0.04,
                sharpe: 1.2,
                max_drawdown: 0.15,
                volatility: Some(0.2),
                beta: None,
            }),
            ..RiskResponse::default()
        }
    }

    struct Failing;

    #[async_trait]
    impl RiskDataSource for Failing {
        async fn fetch_risk(&self, _: &RiskRequest) -> Result<RiskResponse, UpstreamError> {
            Err(UpstreamError::Unavailable("offline".to_string()))
        }
    }

    /// Answers after a delay keyed by the requested portfolio value.
    struct Delayed;

    #[async_trait]
    impl RiskDataSource for Delayed {
        async fn fetch_risk(&self, request: &RiskRequest) -> Result<RiskResponse, UpstreamError> {
            let millis = if request.portfolio_value < 50_000.0 { 200 } else { 10 };
            tokio::time::sleep(Duration::from_millis(millis)).await;
            Ok(payload())
        }
    }

    #[test]
    fn test_view_projection_requires_volatility() {
        let settings = RefreshSettings::default();
        let projector = PortfolioValueProjector::new(settings.projection.clone());

        assert!(view_projection(&projector, &settings, 1_000.0, None).is_none());
        let empty = RiskResponse::default();
        assert!(view_projection(&projector, &settings, 1_000.0, Some(&empty)).is_none());
        assert!(view_projection(&projector, &settings, 0.0, Some(&payload())).is_none());

        let band = view_projection(&projector, &settings, 1_000.0, Some(&payload())).unwrap();
        assert_eq!(band.len(), 31);
        assert_eq!(band.median[0], 1_000.0);
    }

    #[tokio::test]
    async fn test_refresh_publishes_view() {
        let coordinator = RefreshCoordinator::new(
            Arc::new(StaticRiskSource::new(payload())),
            RefreshSettings::default(),
        );
        let outcome = coordinator.refresh(snapshot(100_000.0)).await;
        assert!(matches!(outcome, RefreshOutcome::Applied(_)));

        let view = coordinator.latest_view().unwrap();
        assert_eq!(view.value.current_value, 100_000.0);
        assert_eq!(view.projection.as_ref().unwrap().len(), 31);
        assert!(view.portfolio.is_some());
    }

    #[tokio::test]
    async fn test_failed_fetch_still_publishes() {
        let coordinator = RefreshCoordinator::new(Arc::new(Failing), RefreshSettings::default());
        let outcome = coordinator.refresh(snapshot(10_000.0)).await;
        assert!(matches!(outcome, RefreshOutcome::Applied(_)));

        let view = coordinator.latest_view().unwrap();
        assert!(view.portfolio.is_none());
        assert!(view.projection.is_none());
        assert_eq!(view.value.current_value, 10_000.0);
        assert_eq!(view.unavailable_count(), 2);
    }

    #[tokio::test]
    async fn test_stale_refresh_never_overwrites_newer() {
        let coordinator = RefreshCoordinator::new(Arc::new(Delayed), RefreshSettings::default());

        // The first refresh is slow, the second fast; the first must lose.
        let slow = coordinator.spawn_refresh(snapshot(10_000.0));
        let fast = coordinator.spawn_refresh(snapshot(100_000.0));

        let fast_outcome = fast.await.unwrap();
        let slow_outcome = slow.await.unwrap();

        assert!(matches!(fast_outcome, RefreshOutcome::Applied(_)));
        assert!(matches!(slow_outcome, RefreshOutcome::Superseded { .. }));
        assert_eq!(coordinator.latest_view().unwrap().value.current_value, 100_000.0);
    }

    #[tokio::test]
    async fn test_change_tracks_published_views_only() {
        let coordinator = RefreshCoordinator::new(
            Arc::new(StaticRiskSource::new(payload())),
            RefreshSettings::default(),
        );
        coordinator.refresh(snapshot(100_000.0)).await;
        coordinator.refresh(snapshot(110_000.0)).await;

        let view = coordinator.latest_view().unwrap();
        assert_eq!(view.value.previous_value, Some(100_000.0));
        assert_eq!(view.value.change, 10_000.0);
    }
}
