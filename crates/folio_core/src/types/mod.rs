//! Core value types shared across the workspace.
//!
//! This module provides:
//! - [`Ticker`]: normalised asset identifier
//! - [`RiskMetrics`], [`AnalyticsSeries`]: upstream risk/analytics payloads
//! - [`ProjectionBand`]: median/p10/p90 forward value bands
//! - [`VolatilityBasis`]: the time basis of an upstream volatility figure
//! - [`CoreError`]: construction errors

mod band;
mod error;
mod risk;
mod ticker;

pub use band::ProjectionBand;
pub use error::CoreError;
pub use risk::{
    AnalyticsSeries, CumulativePoint, DrawdownPoint, HistogramBin, RiskMetrics, TodayChange,
    VolatilityBasis, TRADING_DAYS_PER_YEAR,
};
pub use ticker::Ticker;
