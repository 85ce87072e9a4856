//! Rolling volatility over a cumulative-return series.
//!
//! Daily changes are taken as first differences of the cumulative series.
//! The first observation has no predecessor, so its change is defined as
//! zero and never enters a window: the window ending at index `i` covers
//! the changes at `i - window + 1 ..= i`.

use crate::types::{AnalyticsSeries, CoreError, TRADING_DAYS_PER_YEAR};
use serde::{Deserialize, Serialize};

/// Default trailing window length in observations.
pub const DEFAULT_WINDOW: usize = 20;

/// Rolling window parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RollingWindow {
    window: usize,
    annualisation_factor: f64,
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            annualisation_factor: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl RollingWindow {
    /// Creates validated window parameters.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if `window` is zero or the factor is not a
    /// positive finite number.
    pub fn new(window: usize, annualisation_factor: f64) -> Result<Self, CoreError> {
        if window == 0 {
            return Err(CoreError::InvalidWindow(window));
        }
        if !annualisation_factor.is_finite() || annualisation_factor <= 0.0 {
            return Err(CoreError::InvalidAnnualisationFactor(annualisation_factor));
        }
        Ok(Self {
            window,
            annualisation_factor,
        })
    }

    /// Returns the window length.
    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the annualisation factor.
    #[inline]
    pub fn annualisation_factor(&self) -> f64 {
        self.annualisation_factor
    }
}

/// One rolling volatility observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    /// Date of the window's last observation.
    pub date: String,
    /// Annualised volatility of the window.
    pub volatility: f64,
}

/// Computes annualised rolling volatility of a cumulative-return series.
///
/// Each point uses the population variance (divisor = window) of the
/// trailing daily changes. A series with `len <= window` yields an empty
/// result.
///
/// # Examples
///
/// ```
/// use folio_core::analytics::{rolling_risk, RollingWindow};
/// use folio_core::types::AnalyticsSeries;
///
/// let series = AnalyticsSeries::from_cumulative(
///     (0..30).map(|i| (format!("d{}", i), 0.001 * i as f64)),
/// );
/// let points = rolling_risk(&series, &RollingWindow::default());
///
/// assert_eq!(points.len(), 10);
/// assert_eq!(points[0].date, "d20");
/// assert!(points.iter().all(|p| p.volatility.abs() < 1e-12));
/// ```
pub fn rolling_risk(series: &AnalyticsSeries, window: &RollingWindow) -> Vec<RollingPoint> {
    let points = &series.cumulative_returns;
    let w = window.window;
    if points.len() <= w {
        return Vec::new();
    }

    let deltas: Vec<f64> = std::iter::once(0.0)
        .chain(points.windows(2).map(|pair| pair[1].value - pair[0].value))
        .collect();
    let annualise = window.annualisation_factor.sqrt();

    (w..points.len())
        .map(|i| {
            let slice = &deltas[i + 1 - w..=i];
            let mean = slice.iter().sum::<f64>() / w as f64;
            let variance = slice.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / w as f64;

            RollingPoint {
                date: points[i].date.clone(),
                volatility: variance.sqrt() * annualise,
            }
        })
        .collect()
}
