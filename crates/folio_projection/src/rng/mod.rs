//! # Random Number Generation
//!
//! Seeded pseudo-random generation for the forward value projection.
//!
//! - **Reproducibility**: every generator is seeded; shard generators derive
//!   their seeds deterministically from a base seed
//! - **Box–Muller normals**: standard normal deviates are built from two
//!   uniform(0, 1) draws, with exact zeros rejected before the logarithm
//! - **Static dispatch**: simulation code is generic over [`NormalSource`]
//!
//! ## Usage Example
//!
//! ```rust
//! use folio_projection::rng::{NormalSource, ProjectionRng};
//!
//! let mut rng = ProjectionRng::from_seed(12345);
//! let z = rng.next_normal();
//! assert!(z.is_finite());
//!
//! let mut buffer = vec![0.0; 64];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;

pub use prng::{splitmix64, NormalSource, ProjectionRng};
