//! # Upstream Collaborators
//!
//! Wire types and async traits for the two upstream services the engine
//! consumes: the risk-data service and the scenario service.

mod error;
mod wire;

pub use error::UpstreamError;
pub use wire::{
    RiskRequest, RiskResponse, ScenarioImpact, ScenarioRequest, ScenarioResponse,
};

use async_trait::async_trait;
use std::sync::Arc;

/// Source of portfolio and per-asset risk data.
#[async_trait]
pub trait RiskDataSource: Send + Sync {
    /// Fetches risk metrics and analytics for the requested portfolio.
    async fn fetch_risk(&self, request: &RiskRequest) -> Result<RiskResponse, UpstreamError>;
}

/// Evaluator of stress scenarios.
#[async_trait]
pub trait ScenarioService: Send + Sync {
    /// Evaluates one scenario for the requested portfolio.
    async fn evaluate(&self, request: &ScenarioRequest) -> Result<ScenarioResponse, UpstreamError>;
}

#[async_trait]
impl<T: RiskDataSource + ?Sized> RiskDataSource for Arc<T> {
    async fn fetch_risk(&self, request: &RiskRequest) -> Result<RiskResponse, UpstreamError> {
        (**self).fetch_risk(request).await
    }
}

#[async_trait]
impl<T: ScenarioService + ?Sized> ScenarioService for Arc<T> {
    async fn evaluate(&self, request: &ScenarioRequest) -> Result<ScenarioResponse, UpstreamError> {
        (**self).evaluate(request).await
    }
}

/// Risk source that always answers with the same payload.
///
/// Useful for replaying a captured response.
#[derive(Clone, Debug, Default)]
pub struct StaticRiskSource {
    response: RiskResponse,
}

impl StaticRiskSource {
    /// Creates a source replaying `response`.
    pub fn new(response: RiskResponse) -> Self {
        Self { response }
    }
}

#[async_trait]
impl RiskDataSource for StaticRiskSource {
    async fn fetch_risk(&self, request: &RiskRequest) -> Result<RiskResponse, UpstreamError> {
        tracing::debug!(tickers = request.tickers.len(), "serving static risk payload");
        Ok(self.response.clone())
    }
}
