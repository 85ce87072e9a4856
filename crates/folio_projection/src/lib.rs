//! # folio_projection (Layer 2: Simulation)
//!
//! ## Layer 2 Role
//!
//! folio_projection is the Monte Carlo engine of the workspace:
//! - Seeded random number generation with Box–Muller normals (`rng`)
//! - Geometric Brownian Motion path simulation (`mc::gbm`)
//! - Rayon-sharded forward value projection with rank percentile bands
//!   (`mc::projector`)
//! - Terminal and path-wise statistics over simulated paths (`mc::statistics`)
//!
//! ## Reproducibility
//!
//! Paths are simulated in fixed-size shards. Shard `k` owns its own
//! generator seeded from the base seed and `k`, so a given seed and shard
//! size produce the same band whether shards run serially or across the
//! rayon pool.
//!
//! ## Usage Example
//!
//! ```rust
//! use folio_projection::mc::{GbmParams, PortfolioValueProjector, ProjectionConfig};
//!
//! let config = ProjectionConfig::builder()
//!     .path_count(500)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! let projector = PortfolioValueProjector::new(config);
//!
//! let band = projector.project(GbmParams::daily(100_000.0, 0.0005, 0.02), 30);
//! assert_eq!(band.len(), 31);
//! assert_eq!(band.median[0], 100_000.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod rng;

pub use mc::{
    band_from_paths, GbmParams, PathMatrix, PortfolioValueProjector, ProjectionConfig,
    ProjectionConfigError,
};
pub use rng::{NormalSource, ProjectionRng};
