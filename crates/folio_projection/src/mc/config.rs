//! Projection configuration.
//!
//! This module provides the configuration type and builder for the forward
//! value projector.

use super::error::ProjectionConfigError;

/// Default number of simulated paths.
pub const DEFAULT_PATH_COUNT: usize = 1_000;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 1_000_000;

/// Maximum projection horizon in days.
pub const MAX_HORIZON_DAYS: usize = 3_650;

/// Default seed when none is supplied.
pub const DEFAULT_SEED: u64 = 42;

/// Default number of paths per RNG shard.
pub const DEFAULT_SHARD_SIZE: usize = 64;

/// Path count at which shards are dispatched onto the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Upper bound on simulated values (paths × points) held in one matrix.
pub const MAX_PATH_VALUES: usize = 50_000_000;

/// Points per path for a `path_count × (horizon_days + 1)` matrix.
///
/// Returns `None` when the horizon exceeds [`MAX_HORIZON_DAYS`] or the
/// matrix would hold more than [`MAX_PATH_VALUES`] values. A zero horizon
/// is accepted and yields the single day-0 point.
pub fn matrix_points(path_count: usize, horizon_days: usize) -> Option<usize> {
    if horizon_days > MAX_HORIZON_DAYS {
        return None;
    }
    let points = horizon_days + 1;
    path_count
        .checked_mul(points)
        .filter(|&values| values <= MAX_PATH_VALUES)
        .map(|_| points)
}

/// Checks that `horizon_days` lies in `[1, MAX_HORIZON_DAYS]`.
///
/// # Errors
///
/// Returns [`ProjectionConfigError::InvalidHorizon`] otherwise.
pub fn validate_horizon(horizon_days: usize) -> Result<usize, ProjectionConfigError> {
    if horizon_days == 0 || horizon_days > MAX_HORIZON_DAYS {
        return Err(ProjectionConfigError::InvalidHorizon(horizon_days));
    }
    Ok(horizon_days)
}

/// Forward value projection configuration.
///
/// Immutable configuration specifying simulation parameters.
/// Use [`ProjectionConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use folio_projection::mc::ProjectionConfig;
///
/// let config = ProjectionConfig::builder()
///     .path_count(10_000)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.path_count(), 10_000);
/// assert_eq!(config.seed(), 42);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Number of simulation paths.
    path_count: usize,
    /// Base seed; shard seeds derive from it.
    seed: u64,
    /// Paths per RNG shard.
    shard_size: usize,
    /// Path count at which shards run in parallel.
    parallel_threshold: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            path_count: DEFAULT_PATH_COUNT,
            seed: DEFAULT_SEED,
            shard_size: DEFAULT_SHARD_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ProjectionConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> ProjectionConfigBuilder {
        ProjectionConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Returns the base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of paths per RNG shard.
    #[inline]
    pub fn shard_size(&self) -> usize {
        self.shard_size
    }

    /// Returns the path count at which shards run in parallel.
    #[inline]
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Returns the number of shards needed for `path_count` paths.
    #[inline]
    pub fn shard_count(&self) -> usize {
        self.path_count.div_ceil(self.shard_size)
    }

    /// Whether a run of `path_count` paths goes onto the rayon pool.
    #[inline]
    pub fn should_parallelise(&self, path_count: usize) -> bool {
        path_count >= self.parallel_threshold && path_count > self.shard_size
    }

    /// Returns a copy with a different seed.
    #[inline]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionConfigError` if:
    /// - `path_count` is greater than 1,000,000
    /// - `shard_size` is 0
    pub fn validate(&self) -> Result<(), ProjectionConfigError> {
        if self.path_count > MAX_PATHS {
            return Err(ProjectionConfigError::InvalidPathCount(self.path_count));
        }
        if self.shard_size == 0 {
            return Err(ProjectionConfigError::InvalidParameter {
                name: "shard_size",
                value: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`ProjectionConfig`].
///
/// Unset fields fall back to the defaults: 1000 paths, seed 42, 64 paths
/// per shard and a parallel threshold of 256 paths.
///
/// # Examples
///
/// ```rust
/// use folio_projection::mc::ProjectionConfig;
///
/// let config = ProjectionConfig::builder()
///     .path_count(5_000)
///     .shard_size(128)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.shard_count(), 40);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ProjectionConfigBuilder {
    path_count: Option<usize>,
    seed: Option<u64>,
    shard_size: Option<usize>,
    parallel_threshold: Option<usize>,
}

impl ProjectionConfigBuilder {
    /// Sets the number of simulation paths.
    ///
    /// Zero is accepted and yields a flat band at projection time.
    #[inline]
    pub fn path_count(mut self, path_count: usize) -> Self {
        self.path_count = Some(path_count);
        self
    }

    /// Sets the base seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of paths per RNG shard.
    #[inline]
    pub fn shard_size(mut self, shard_size: usize) -> Self {
        self.shard_size = Some(shard_size);
        self
    }

    /// Sets the path count at which shards run in parallel.
    #[inline]
    pub fn parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = Some(parallel_threshold);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionConfigError` when validation fails.
    pub fn build(self) -> Result<ProjectionConfig, ProjectionConfigError> {
        let config = ProjectionConfig {
            path_count: self.path_count.unwrap_or(DEFAULT_PATH_COUNT),
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            shard_size: self.shard_size.unwrap_or(DEFAULT_SHARD_SIZE),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        };

        config.validate()?;
        Ok(config)
    }
}
