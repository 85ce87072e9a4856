//! # Monte Carlo Forward Projection
//!
//! GBM path simulation, the rank percentile band projector and statistics
//! over completed paths.
//!
//! ## Module Structure
//!
//! - `config`: projection configuration and builder
//! - `error`: configuration errors
//! - `gbm`: GBM parameters and single-path stepping
//! - `paths`: row-major path storage
//! - `projector`: sharded simulation and band reduction
//! - `statistics`: expected loss, VaR and drawdown over paths
//! - `recovery`: mean-reverting recovery after a stress

mod config;
mod error;
mod gbm;
mod paths;
mod projector;
pub mod recovery;
pub mod statistics;

pub use config::{
    matrix_points, validate_horizon, ProjectionConfig, ProjectionConfigBuilder,
    DEFAULT_PARALLEL_THRESHOLD, DEFAULT_PATH_COUNT, DEFAULT_SEED, DEFAULT_SHARD_SIZE,
    MAX_HORIZON_DAYS, MAX_PATHS, MAX_PATH_VALUES,
};
pub use error::ProjectionConfigError;
pub use gbm::GbmParams;
pub use paths::PathMatrix;
pub use projector::{band_from_paths, rank_index, PortfolioValueProjector, P10, P50, P90};
pub use recovery::RecoveryModel;
pub use statistics::PathStatistics;
