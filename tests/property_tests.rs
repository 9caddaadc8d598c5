//! Property-based tests for the pipeline stages.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series.

use lagboost::core::{RegressorSet, Series};
use lagboost::features::build;
use lagboost::models::{Forecaster, RoundsSelection, XgbAr, XgbArConfig};
use lagboost::seasonality::SeasonalMethod;
use lagboost::transform::{difference, integrate, inv_modulus, modulus, TrendState};
use proptest::prelude::*;

/// Strategy for generating values of either sign.
fn signed_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| prop::collection::vec(-500.0..500.0_f64, len))
}

/// Strategy for generating seasonal series.
fn seasonal_values_strategy(
    min_len: usize,
    max_len: usize,
    period: usize,
) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(move |len| {
        (50.0..100.0_f64, 5.0..20.0_f64).prop_map(move |(base, amplitude)| {
            (0..len)
                .map(|i| {
                    base + amplitude * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                })
                .collect()
        })
    })
}

// =============================================================================
// Property: the modulus transform is invertible
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn modulus_roundtrip(
        values in signed_values_strategy(1, 50),
        lambda in -1.0..2.0_f64
    ) {
        let restored = inv_modulus(&modulus(&values, lambda), lambda);
        for (x, r) in values.iter().zip(restored.iter()) {
            prop_assert!(
                (x - r).abs() <= 1e-6 * (1.0 + x.abs()),
                "lambda {}: {} -> {}", lambda, x, r
            );
        }
    }

    #[test]
    fn modulus_preserves_sign(
        values in signed_values_strategy(1, 50),
        lambda in -1.0..2.0_f64
    ) {
        for (x, y) in values.iter().zip(modulus(&values, lambda).iter()) {
            prop_assert!(x.signum() == y.signum() || *x == 0.0);
        }
    }
}

// =============================================================================
// Property: integration undoes differencing
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn difference_then_integrate_restores_tail(
        values in signed_values_strategy(3, 60),
        order in 0usize..=2
    ) {
        let diffs = difference(&values, order).unwrap();
        prop_assert_eq!(diffs.len(), values.len() - order);

        let state = TrendState::leading(&values, order).unwrap();
        let restored = integrate(&diffs, &state);
        for (x, r) in values[order..].iter().zip(restored.iter()) {
            prop_assert!((x - r).abs() <= 1e-6 * (1.0 + x.abs()));
        }
    }
}

// =============================================================================
// Property: lag-matrix shape and determinism
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn lag_matrix_shape(
        values in signed_values_strategy(2, 80),
        lag_frac in 0.0..1.0_f64,
        n_regressors in 0usize..3
    ) {
        let n = values.len();
        let maxlag = 1 + ((n - 2) as f64 * lag_frac) as usize;

        let mut regs = RegressorSet::new();
        for r in 0..n_regressors {
            regs = regs
                .with_column(format!("x{}", r), values.iter().map(|v| v * r as f64).collect())
                .unwrap();
        }
        let regs = (n_regressors > 0).then_some(&regs);

        let (x, y) = build(&values, "y", regs, maxlag).unwrap();
        prop_assert_eq!(x.n_rows(), n - maxlag);
        prop_assert_eq!(x.n_cols(), maxlag * (1 + n_regressors));
        prop_assert_eq!(y.len(), n - maxlag);
        prop_assert_eq!(&y[..], &values[maxlag..]);

        let again = build(&values, "y", regs, maxlag).unwrap();
        prop_assert_eq!(x, again.0);
    }
}

// =============================================================================
// Property: fitting is deterministic and forecasts are finite
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))]

    #[test]
    fn boosted_forecasts_are_deterministic_and_finite(
        values in seasonal_values_strategy(36, 60, 12),
        horizon in 1usize..12
    ) {
        let series = Series::new(values, 12).unwrap();
        let config = XgbArConfig::new()
            .with_maxlag(12)
            .with_seasonal(SeasonalMethod::Dummies)
            .with_rounds(RoundsSelection::Manual { rounds: 10 });

        let mut first = XgbAr::new(config.clone());
        let mut second = XgbAr::new(config);
        first.fit(&series).unwrap();
        second.fit(&series).unwrap();

        let a = first.predict(horizon).unwrap();
        let b = second.predict(horizon).unwrap();
        prop_assert_eq!(a.horizon(), horizon);
        prop_assert_eq!(a.point(), b.point());
        for val in a.point() {
            prop_assert!(val.is_finite(), "Forecast contains non-finite value: {}", val);
        }
    }
}
