//! Forward portfolio value projector.
//!
//! Simulates GBM paths in seeded shards, waits for every shard to finish,
//! then reduces each day offset to its p10/median/p90 by rank.

use super::config::{matrix_points, ProjectionConfig, MAX_HORIZON_DAYS};
use super::gbm::GbmParams;
use super::paths::PathMatrix;
use crate::rng::{NormalSource, ProjectionRng};
use folio_core::ProjectionBand;
use rayon::prelude::*;

/// Lower band quantile.
pub const P10: f64 = 0.10;
/// Central band quantile.
pub const P50: f64 = 0.50;
/// Upper band quantile.
pub const P90: f64 = 0.90;

/// Rank of quantile `q` in a sorted sample of `n` values: `floor(q·n)`,
/// clamped to the last index.
#[inline]
pub fn rank_index(q: f64, n: usize) -> usize {
    debug_assert!(n > 0);
    ((q * n as f64).floor() as usize).min(n - 1)
}

fn band_point(mut column: Vec<f64>) -> (f64, f64, f64) {
    column.sort_by(f64::total_cmp);
    let n = column.len();
    (
        column[rank_index(P50, n)],
        column[rank_index(P10, n)],
        column[rank_index(P90, n)],
    )
}

/// Reduces a completed path matrix to a rank percentile band.
///
/// An empty matrix yields an empty band.
pub fn band_from_paths(paths: &PathMatrix) -> ProjectionBand {
    if paths.is_empty() {
        return ProjectionBand::empty();
    }
    let points: Vec<(f64, f64, f64)> = (0..paths.points_per_path())
        .into_par_iter()
        .map(|day| band_point(paths.day_values(day)))
        .collect();
    collect_band(points)
}

fn collect_band(points: Vec<(f64, f64, f64)>) -> ProjectionBand {
    let mut band = ProjectionBand::with_capacity(points.len());
    for (median, p10, p90) in points {
        band.median.push(median);
        band.p10.push(p10);
        band.p90.push(p90);
    }
    band
}

fn is_degenerate(seed_value: f64, path_count: usize) -> bool {
    seed_value.is_nan() || seed_value <= 0.0 || path_count == 0
}

fn simulate_shard(
    base_seed: u64,
    shard: usize,
    params: &GbmParams,
    chunk: &mut [f64],
    points: usize,
) {
    let mut rng = ProjectionRng::for_shard(base_seed, shard as u64);
    for path in chunk.chunks_mut(points) {
        params.simulate_path(&mut rng, path);
    }
}

fn reject_shape(path_count: usize, horizon_days: usize) {
    tracing::warn!(
        path_count,
        horizon_days,
        max_horizon_days = MAX_HORIZON_DAYS,
        "projection shape out of range, returning empty result"
    );
}

/// Monte Carlo projector of a portfolio's forward value.
///
/// # Examples
///
/// ```rust
/// use folio_projection::mc::{GbmParams, PortfolioValueProjector, ProjectionConfig};
///
/// let projector = PortfolioValueProjector::new(ProjectionConfig::default());
/// let band = projector.project(GbmParams::daily(1_000.0, 0.0, 0.0), 5);
///
/// assert_eq!(band.len(), 6);
/// assert!(band.p10.iter().all(|&v| v == 1_000.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PortfolioValueProjector {
    config: ProjectionConfig,
}

impl PortfolioValueProjector {
    /// Creates a projector with the given configuration.
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Returns the projector configuration.
    #[inline]
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Simulates `path_count` paths of `horizon_days + 1` points.
    ///
    /// Shard `k` covers paths `k·shard_size..` and owns its own generator, so
    /// the matrix is identical whether shards run serially or in parallel.
    /// A horizon above [`MAX_HORIZON_DAYS`] or a matrix larger than
    /// [`MAX_PATH_VALUES`](super::config::MAX_PATH_VALUES) yields an empty
    /// matrix.
    pub fn simulate_paths(&self, params: GbmParams, horizon_days: usize) -> PathMatrix {
        let path_count = self.config.path_count();
        let Some(points) = matrix_points(path_count, horizon_days) else {
            reject_shape(path_count, horizon_days);
            return PathMatrix::zeroed(0, 0);
        };
        let seed = self.config.seed();
        let shard_len = self.config.shard_size().saturating_mul(points);

        let mut matrix = PathMatrix::zeroed(path_count, points);
        let buffer = matrix.as_mut_slice();

        if self.config.should_parallelise(path_count) {
            buffer
                .par_chunks_mut(shard_len)
                .enumerate()
                .for_each(|(shard, chunk)| simulate_shard(seed, shard, &params, chunk, points));
        } else {
            buffer
                .chunks_mut(shard_len)
                .enumerate()
                .for_each(|(shard, chunk)| simulate_shard(seed, shard, &params, chunk, points));
        }

        matrix
    }

    /// Projects the forward value band over `horizon_days` days.
    ///
    /// The band has `horizon_days + 1` points per array with the seed value
    /// at offset 0. A non-positive seed value or a zero path count yields a
    /// flat band at the seed value. An out-of-range shape yields an empty
    /// band.
    pub fn project(&self, params: GbmParams, horizon_days: usize) -> ProjectionBand {
        let path_count = self.config.path_count();
        if matrix_points(path_count, horizon_days).is_none() {
            reject_shape(path_count, horizon_days);
            return ProjectionBand::empty();
        }
        if is_degenerate(params.seed_value, path_count) {
            tracing::debug!(
                seed_value = params.seed_value,
                path_count,
                "degenerate projection, returning flat band"
            );
            return ProjectionBand::flat(params.seed_value, horizon_days);
        }

        let paths = self.simulate_paths(params, horizon_days);
        let band = band_from_paths(&paths);
        tracing::debug!(
            horizon_days,
            path_count = paths.path_count(),
            terminal_median = band.median.last().copied().unwrap_or(params.seed_value),
            "projection complete"
        );
        band
    }

    /// Projects with a caller-supplied normal source on the current thread.
    ///
    /// Paths are drawn sequentially from `rng`, path 0 first. Shapes are
    /// bounded as in [`project`](Self::project).
    pub fn project_with<R: NormalSource>(
        params: GbmParams,
        horizon_days: usize,
        path_count: usize,
        rng: &mut R,
    ) -> ProjectionBand {
        let Some(points) = matrix_points(path_count, horizon_days) else {
            reject_shape(path_count, horizon_days);
            return ProjectionBand::empty();
        };
        if is_degenerate(params.seed_value, path_count) {
            return ProjectionBand::flat(params.seed_value, horizon_days);
        }
        let mut matrix = PathMatrix::zeroed(path_count, points);
        for path in matrix.as_mut_slice().chunks_mut(points) {
            params.simulate_path(rng, path);
        }
        band_from_paths(&matrix)
    }
}
