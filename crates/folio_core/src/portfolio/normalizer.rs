//! Weight normalisation.
//!
//! Rescales arbitrary non-negative asset weights and a cash amount so that
//! assets plus cash sum to 100. A zero total is an explicit branch and
//! yields the empty portfolio rather than NaN weights.

use crate::types::Ticker;
use std::collections::BTreeMap;

/// Relative tolerance for the "sums to 100" postcondition.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Normalises asset weights and cash into percentages.
///
/// Returns `(normalised_assets, normalised_cash)`. If the combined total is
/// zero (or not a positive number) the result is an empty asset map with
/// zero cash.
///
/// # Examples
///
/// ```
/// use folio_core::portfolio::normalize;
/// use folio_core::types::Ticker;
/// use std::collections::BTreeMap;
///
/// let mut raw = BTreeMap::new();
/// raw.insert(Ticker::new("AAPL"), 3.0);
/// raw.insert(Ticker::new("GOOG"), 1.0);
///
/// let (assets, cash) = normalize(&raw, 4.0);
/// assert!((assets["AAPL"] - 37.5).abs() < 1e-12);
/// assert!((assets["GOOG"] - 12.5).abs() < 1e-12);
/// assert!((cash - 50.0).abs() < 1e-12);
///
/// let (empty, zero) = normalize(&BTreeMap::new(), 0.0);
/// assert!(empty.is_empty());
/// assert_eq!(zero, 0.0);
/// ```
pub fn normalize(assets: &BTreeMap<Ticker, f64>, cash: f64) -> (BTreeMap<Ticker, f64>, f64) {
    let total: f64 = assets.values().sum::<f64>() + cash;

    if total.is_nan() || total <= 0.0 {
        return (BTreeMap::new(), 0.0);
    }

    let scale = 100.0 / total;
    let normalised = assets
        .iter()
        .map(|(ticker, weight)| (ticker.clone(), weight * scale))
        .collect();

    (normalised, cash * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn raw(pairs: &[(&str, f64)]) -> BTreeMap<Ticker, f64> {
        pairs.iter().map(|(t, w)| (Ticker::new(t), *w)).collect()
    }

    // ================================================================
    // Degenerate totals
    // ================================================================

    #[test]
    fn test_normalize_empty_with_zero_cash() {
        let (assets, cash) = normalize(&BTreeMap::new(), 0.0);
        assert!(assets.is_empty());
        assert_eq!(cash, 0.0);
    }

    #[test]
    fn test_normalize_zero_weights_drops_assets() {
        let (assets, cash) = normalize(&raw(&[("AAPL", 0.0), ("GOOG", 0.0)]), 0.0);
        assert!(assets.is_empty());
        assert_eq!(cash, 0.0);
    }

    #[test]
    fn test_normalize_cash_only() {
        let (assets, cash) = normalize(&BTreeMap::new(), 2_500.0);
        assert!(assets.is_empty());
        assert_relative_eq!(cash, 100.0);
    }

    // ================================================================
    // Scaling
    // ================================================================

    #[test]
    fn test_normalize_adds_new_asset() {
        // Adding a 5% holding to a full portfolio rescales everything.
        let (assets, cash) = normalize(&raw(&[("AAPL", 40.0), ("GOOG", 60.0), ("TSLA", 5.0)]), 0.0);

        assert_relative_eq!(assets["AAPL"], 40.0 / 105.0 * 100.0, epsilon = 1e-12);
        assert_relative_eq!(assets["TSLA"], 5.0 / 105.0 * 100.0, epsilon = 1e-12);
        assert_eq!(cash, 0.0);
    }

    #[test]
    fn test_normalize_already_normalised_is_stable() {
        let input = raw(&[("AAPL", 60.0), ("GOOG", 40.0)]);
        let (assets, cash) = normalize(&input, 0.0);

        assert_relative_eq!(assets["AAPL"], 60.0, epsilon = 1e-12);
        assert_relative_eq!(assets["GOOG"], 40.0, epsilon = 1e-12);
        assert_eq!(cash, 0.0);
    }

    proptest! {
        #[test]
        fn prop_normalized_sums_to_hundred(
            weights in proptest::collection::vec(0.0f64..1e6, 0..12),
            cash in 0.0f64..1e6,
        ) {
            let input: BTreeMap<Ticker, f64> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (Ticker::new(format!("T{}", i)), *w))
                .collect();
            let total: f64 = weights.iter().sum::<f64>() + cash;
            prop_assume!(total > 0.0);

            let (assets, norm_cash) = normalize(&input, cash);
            let sum: f64 = assets.values().sum::<f64>() + norm_cash;
            prop_assert!((sum - 100.0).abs() <= 100.0 * WEIGHT_SUM_TOLERANCE);
        }

        #[test]
        fn prop_normalize_is_idempotent(
            weights in proptest::collection::vec(0.01f64..1e4, 1..8),
            cash in 0.0f64..1e4,
        ) {
            let input: BTreeMap<Ticker, f64> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (Ticker::new(format!("T{}", i)), *w))
                .collect();

            let (once, once_cash) = normalize(&input, cash);
            let (twice, twice_cash) = normalize(&once, once_cash);

            prop_assert!((once_cash - twice_cash).abs() < 1e-9);
            for (ticker, value) in &once {
                prop_assert!((value - twice[ticker]).abs() < 1e-9);
            }
        }
    }
}
