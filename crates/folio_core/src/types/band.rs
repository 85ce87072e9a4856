//! Forward projection band.

use serde::{Deserialize, Serialize};

/// Median/p10/p90 forward value band.
///
/// Index `t` of each array is the value at day offset `t`, with index 0
/// holding the seed value. A well-formed band has three arrays of equal
/// length.
///
/// # Examples
///
/// ```
/// use folio_core::types::ProjectionBand;
///
/// let band = ProjectionBand::flat(100_000.0, 30);
/// assert_eq!(band.len(), 31);
/// assert_eq!(band.horizon_days(), Some(30));
/// assert!(band.median.iter().all(|&v| v == 100_000.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBand {
    /// Median value per day offset.
    #[serde(default)]
    pub median: Vec<f64>,
    /// 10th percentile value per day offset.
    #[serde(default)]
    pub p10: Vec<f64>,
    /// 90th percentile value per day offset.
    #[serde(default)]
    pub p90: Vec<f64>,
}

impl ProjectionBand {
    /// Creates an empty band.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a band holding `value` at every offset `0..=horizon_days`.
    pub fn flat(value: f64, horizon_days: usize) -> Self {
        let points = vec![value; horizon_days + 1];
        Self {
            median: points.clone(),
            p10: points.clone(),
            p90: points,
        }
    }

    /// Creates a band with pre-allocated capacity for `points` offsets.
    pub fn with_capacity(points: usize) -> Self {
        Self {
            median: Vec::with_capacity(points),
            p10: Vec::with_capacity(points),
            p90: Vec::with_capacity(points),
        }
    }

    /// Returns the number of day offsets (the median length).
    #[inline]
    pub fn len(&self) -> usize {
        self.median.len()
    }

    /// Returns `true` if the band holds no offsets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.median.is_empty()
    }

    /// Returns the horizon in days, or `None` for an empty band.
    #[inline]
    pub fn horizon_days(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    /// Returns `true` if all three arrays have equal length.
    pub fn is_consistent(&self) -> bool {
        self.median.len() == self.p10.len() && self.median.len() == self.p90.len()
    }

    /// Returns a copy keeping offsets `0..=horizon_days`.
    pub fn truncated(&self, horizon_days: usize) -> Self {
        let keep = horizon_days.saturating_add(1);
        Self {
            median: self.median.iter().take(keep).copied().collect(),
            p10: self.p10.iter().take(keep).copied().collect(),
            p90: self.p90.iter().take(keep).copied().collect(),
        }
    }

    /// Returns the median line scaled by `factor` at every offset.
    pub fn scaled_median(&self, factor: f64) -> Vec<f64> {
        self.median.iter().map(|v| v * factor).collect()
    }
}
