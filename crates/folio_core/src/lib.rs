//! # folio_core: Foundation Types for Portfolio Risk Analytics
//!
//! ## Layer 1 (Foundation) Role
//!
//! folio_core is the bottom layer of the workspace, providing:
//! - Ticker identifiers with case/space normalisation (`types::ticker`)
//! - Upstream risk payload types: `RiskMetrics`, `AnalyticsSeries` (`types::risk`)
//! - Forward projection bands: `ProjectionBand` (`types::band`)
//! - Portfolio weights and the weight normaliser (`portfolio`)
//! - Rolling volatility over cumulative-return series (`analytics`)
//! - Error types: `CoreError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other folio_* crates, with minimal external dependencies:
//! - serde: payload (de)serialisation
//! - thiserror: error derivation
//!
//! ## Usage Examples
//!
//! ```rust
//! use folio_core::portfolio::PortfolioWeights;
//!
//! let weights = PortfolioWeights::from_raw([("aapl", 30.0), ("GOOG", 20.0)], 50.0).unwrap();
//!
//! assert!((weights.weight_of("AAPL").unwrap() - 30.0).abs() < 1e-9);
//! assert!((weights.cash_pct() - 50.0).abs() < 1e-9);
//! assert!(weights.is_balanced());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytics;
pub mod portfolio;
pub mod types;

pub use analytics::{rolling_risk, RollingPoint, RollingWindow};
pub use portfolio::{normalize, HoldingRecord, PortfolioWeights, CASH_TICKER};
pub use types::{
    AnalyticsSeries, CoreError, CumulativePoint, DrawdownPoint, HistogramBin, ProjectionBand,
    RiskMetrics, Ticker, TodayChange, VolatilityBasis, TRADING_DAYS_PER_YEAR,
};
