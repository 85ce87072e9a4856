//! Terminal and path-wise statistics over simulated paths.

use super::paths::PathMatrix;

/// Quantile of an ascending-sorted sample by linear interpolation between
/// closest ranks. Returns `None` for an empty sample.
///
/// # Examples
///
/// ```rust
/// use folio_projection::mc::statistics::quantile_linear;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile_linear(&sorted, 0.5), Some(2.5));
/// assert_eq!(quantile_linear(&sorted, 1.0), Some(4.0));
/// ```
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Sorts a copy of `values` and takes its linear quantile.
pub fn quantile_of(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_linear(&sorted, q)
}

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Worst drawdown along one path.
///
/// Returns `(drawdown, trough_index)` where `drawdown` is the most negative
/// `(v - running_peak) / running_peak` (zero for a non-decreasing path).
pub fn path_max_drawdown(path: &[f64]) -> (f64, usize) {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0;
    let mut trough = 0;
    for (index, &value) in path.iter().enumerate() {
        peak = peak.max(value);
        if peak > 0.0 {
            let drawdown = (value - peak) / peak;
            if drawdown < worst {
                worst = drawdown;
                trough = index;
            }
        }
    }
    (worst, trough)
}

/// Summary statistics of a completed simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct PathStatistics {
    /// `initial_value - mean(terminal values)`; positive means a loss.
    pub expected_loss: f64,
    /// 5% quantile of terminal returns, as a fraction (negative is a loss).
    pub var_95: f64,
    /// Median over paths of each path's worst drawdown, as a fraction (≤ 0).
    pub max_drawdown: f64,
    /// Absolute worst drawdown of each path.
    pub drawdown_severities: Vec<f64>,
    /// Value at each path's worst drawdown.
    pub trough_values: Vec<f64>,
}

impl PathStatistics {
    /// Computes statistics relative to `initial_value`.
    ///
    /// Returns `None` when the matrix holds no paths or `initial_value` is
    /// not positive.
    pub fn compute(paths: &PathMatrix, initial_value: f64) -> Option<Self> {
        if paths.is_empty() || initial_value.is_nan() || initial_value <= 0.0 {
            return None;
        }

        let terminal = paths.terminal_values();
        let expected_loss = initial_value - mean(&terminal)?;

        let returns: Vec<f64> = terminal
            .iter()
            .map(|v| (v - initial_value) / initial_value)
            .collect();
        let var_95 = quantile_of(&returns, 0.05)?;

        let mut drawdowns = Vec::with_capacity(paths.path_count());
        let mut trough_values = Vec::with_capacity(paths.path_count());
        for path in paths.paths() {
            let (drawdown, trough) = path_max_drawdown(path);
            drawdowns.push(drawdown);
            trough_values.push(path[trough]);
        }
        let max_drawdown = quantile_of(&drawdowns, 0.5)?;
        let drawdown_severities = drawdowns.iter().map(|d| d.abs()).collect();

        Some(Self {
            expected_loss,
            var_95,
            max_drawdown,
            drawdown_severities,
            trough_values,
        })
    }

    /// Given percentile of per-path drawdown severity.
    pub fn severity_quantile(&self, q: f64) -> f64 {
        quantile_of(&self.drawdown_severities, q).unwrap_or(0.0)
    }

    /// Median trough value.
    pub fn median_trough(&self) -> f64 {
        quantile_of(&self.trough_values, 0.5).unwrap_or(0.0)
    }
}
