//! Portfolio composition.
//!
//! This module provides:
//! - [`normalize`]: rescales raw weights plus cash to percentages summing to 100
//! - [`PortfolioWeights`]: normalised composition, replaced wholesale on edit
//! - [`HoldingRecord`]: persistence row mapping with the synthetic `CASH` ticker

mod normalizer;
mod records;
mod weights;

pub use normalizer::{normalize, WEIGHT_SUM_TOLERANCE};
pub use records::{HoldingRecord, CASH_TICKER};
pub use weights::{PortfolioWeights, DEFAULT_NEW_ASSET_WEIGHT};
