//! Post-drawdown recovery simulation.
//!
//! After a stress the value restarts at the trough and mean-reverts toward
//! its pre-stress level:
//! `v[t] = v[t-1] + θ·(target - v[t-1])·Δt + σ·v[t-1]·√Δt·Z`.
//! A path recovers on the first day its value reaches the target.

use crate::rng::NormalSource;
use folio_core::TRADING_DAYS_PER_YEAR;

/// Trading days in a month for month conversions.
pub const TRADING_DAYS_PER_MONTH: f64 = 21.0;

/// Recovery months reported when no path recovers in the allowed window.
pub const NO_RECOVERY_MONTHS: f64 = 36.0;

/// Mean-reverting recovery model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecoveryModel {
    /// Value a path must reach to count as recovered.
    pub target: f64,
    /// Mean-reversion speed per year.
    pub theta: f64,
    /// Annual volatility of the recovery process.
    pub volatility: f64,
    /// Maximum number of simulated trading days.
    pub max_days: usize,
}

impl RecoveryModel {
    /// Selects the reversion speed from the severity of the stress.
    ///
    /// Severity above 35% recovers at 0.10, above 20% at 0.18, otherwise at
    /// 0.30. The window is three trading years at 15% volatility.
    pub fn for_severity(target: f64, severity: f64) -> Self {
        let theta = if severity > 0.35 {
            0.10
        } else if severity > 0.20 {
            0.18
        } else {
            0.30
        };
        Self {
            target,
            theta,
            volatility: 0.15,
            max_days: 3 * TRADING_DAYS_PER_YEAR as usize,
        }
    }

    /// Simulates `path_count` paths from `start` and returns, in ascending
    /// order, each day on which at least one path first reached the target.
    ///
    /// A day appears once however many paths recover on it.
    pub fn recovery_days<R: NormalSource>(
        &self,
        start: f64,
        path_count: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let dt = 1.0 / TRADING_DAYS_PER_YEAR;
        let sqrt_dt = dt.sqrt();
        let mut active = vec![start; path_count];
        let mut recovered = Vec::new();

        for day in 1..self.max_days {
            if active.is_empty() {
                break;
            }
            let before = active.len();
            active.retain_mut(|value| {
                let drift = self.theta * (self.target - *value) * dt;
                let diffusion = self.volatility * *value * sqrt_dt * rng.next_normal();
                *value += drift + diffusion;
                *value < self.target
            });
            if active.len() < before {
                recovered.push(day);
            }
        }
        recovered
    }

    /// Recovery time in months: the 60th percentile of recovery days over 21,
    /// rounded to one decimal. No recovered path gives 36 months.
    pub fn recovery_months<R: NormalSource>(
        &self,
        start: f64,
        path_count: usize,
        rng: &mut R,
    ) -> f64 {
        let days: Vec<f64> = self
            .recovery_days(start, path_count, rng)
            .into_iter()
            .map(|d| d as f64)
            .collect();
        match super::statistics::quantile_linear(&days, 0.60) {
            Some(p60) => (p60 / TRADING_DAYS_PER_MONTH * 10.0).round() / 10.0,
            None => NO_RECOVERY_MONTHS,
        }
    }
}
