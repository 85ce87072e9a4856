//! # folio_risk (Layer 3: Application)
//!
//! ## Layer 3 Role
//!
//! folio_risk turns portfolio weights and upstream risk payloads into the
//! views a caller displays:
//! - Upstream wire types and async collaborator traits (`upstream`)
//! - Consolidated portfolio view with risk levels and value change (`aggregator`)
//! - Stress scenario catalogue, engine and factor-model evaluator (`scenarios`)
//! - Caller-owned portfolio state (`session`)
//! - Last-request-wins sequencing and the background refresh (`sequencing`, `refresh`)
//!
//! ## Failure Model
//!
//! Nothing here is fatal. An absent or failed upstream payload yields a view
//! built without risk data; a missing per-asset entry marks that asset as
//! unavailable; an unknown scenario is neutral.
//!
//! ## Usage Example
//!
//! ```rust
//! use folio_risk::scenarios::{scenario_line, ScenarioKind};
//!
//! let baseline = vec![100.0, 101.0, 102.0];
//! let crash = scenario_line(&baseline, ScenarioKind::MarketCrash.headline_impact_pct());
//! assert!((crash[0] - 84.8).abs() < 1e-9);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod aggregator;
pub mod refresh;
pub mod scenarios;
pub mod sequencing;
pub mod session;
pub mod upstream;

pub use aggregator::{
    AssetView, ConsolidatedView, MetricCards, MetricsAggregator, RiskLevel, ValueSummary,
};
pub use refresh::{RefreshCoordinator, RefreshOutcome, RefreshSettings};
pub use scenarios::{FactorModelEvaluator, ScenarioEngine, ScenarioKind, ScenarioResult};
pub use sequencing::{LatestSlot, RequestSequencer, RequestTicket};
pub use session::{PortfolioSession, PortfolioSnapshot};
pub use upstream::{
    RiskDataSource, RiskRequest, RiskResponse, ScenarioRequest, ScenarioResponse, ScenarioService,
    StaticRiskSource, UpstreamError,
};
