//! Geometric Brownian Motion value dynamics.
//!
//! A path starts at the seed value and evolves as
//! `v[t] = v[t-1] * exp((μ - σ²/2)·Δt + σ·√Δt·Z)` with `Z ~ N(0, 1)`.

use crate::rng::NormalSource;
use folio_core::TRADING_DAYS_PER_YEAR;

/// GBM parameters for a single value process.
///
/// `drift` and `volatility` are expressed per unit of `dt`. The daily
/// constructor uses `dt = 1` so that drift and volatility are per day;
/// [`GbmParams::annual`] uses `dt = 1/252` with annual parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmParams {
    /// Value at offset 0.
    pub seed_value: f64,
    /// Drift per unit time.
    pub drift: f64,
    /// Volatility per unit time.
    pub volatility: f64,
    /// Time step between consecutive points.
    pub dt: f64,
}

impl GbmParams {
    /// Daily parameters stepped one day at a time.
    #[inline]
    pub fn daily(seed_value: f64, daily_drift: f64, daily_volatility: f64) -> Self {
        Self {
            seed_value,
            drift: daily_drift,
            volatility: daily_volatility,
            dt: 1.0,
        }
    }

    /// Annual parameters stepped one trading day (1/252 year) at a time.
    #[inline]
    pub fn annual(seed_value: f64, annual_drift: f64, annual_volatility: f64) -> Self {
        Self {
            seed_value,
            drift: annual_drift,
            volatility: annual_volatility,
            dt: 1.0 / TRADING_DAYS_PER_YEAR,
        }
    }

    /// Deterministic part of the log increment, `(μ - σ²/2)·Δt`.
    #[inline]
    pub fn log_drift(&self) -> f64 {
        (self.drift - 0.5 * self.volatility * self.volatility) * self.dt
    }

    /// Diffusion scale of the log increment, `σ·√Δt`.
    #[inline]
    pub fn diffusion(&self) -> f64 {
        self.volatility * self.dt.sqrt()
    }

    /// Fills `out` with one path. `out[0]` is the seed value.
    pub fn simulate_path<R: NormalSource>(&self, rng: &mut R, out: &mut [f64]) {
        let Some((first, rest)) = out.split_first_mut() else {
            return;
        };
        *first = self.seed_value;

        let log_drift = self.log_drift();
        let diffusion = self.diffusion();
        let mut value = self.seed_value;
        for slot in rest.iter_mut() {
            let z = rng.next_normal();
            value *= (log_drift + diffusion * z).exp();
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ProjectionRng;
    use approx::assert_relative_eq;

    struct ConstantNormals(f64);

    impl NormalSource for ConstantNormals {
        fn next_normal(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_zero_parameters_stay_flat() {
        let params = GbmParams::daily(100.0, 0.0, 0.0);
        let mut out = vec![0.0; 11];
        params.simulate_path(&mut ProjectionRng::from_seed(1), &mut out);
        assert!(out.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_pure_drift_compounds() {
        let params = GbmParams::daily(100.0, 0.01, 0.0);
        let mut out = vec![0.0; 4];
        params.simulate_path(&mut ConstantNormals(0.0), &mut out);
        assert_relative_eq!(out[3], 100.0 * (0.03_f64).exp(), epsilon = 1e-10);
    }

    #[test]
    fn test_shock_applies_ito_correction() {
        let params = GbmParams::daily(1.0, 0.0, 0.1);
        let mut out = vec![0.0; 2];
        params.simulate_path(&mut ConstantNormals(1.0), &mut out);
        assert_relative_eq!(out[1], (-0.005_f64 + 0.1).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_annual_time_step() {
        let params = GbmParams::annual(1.0, 0.252, 0.0);
        assert_relative_eq!(params.dt, 1.0 / 252.0);
        assert_relative_eq!(params.log_drift(), 0.001, epsilon = 1e-15);
    }

    #[test]
    fn test_empty_output_is_noop() {
        let params = GbmParams::daily(1.0, 0.0, 0.1);
        let mut out: Vec<f64> = Vec::new();
        params.simulate_path(&mut ConstantNormals(1.0), &mut out);
        assert!(out.is_empty());
    }
}
