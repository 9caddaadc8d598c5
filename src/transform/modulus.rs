//! Modulus power transformation.
//!
//! The John-Draper modulus transform generalises Box-Cox to the whole real
//! line by applying the power to `|x| + 1` and restoring the sign, so it is
//! defined for zero and negative observations.

use crate::error::{ForecastError, Result};

/// How the transform exponent is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lambda {
    /// Use the given exponent. `Fixed(1.0)` disables the transform.
    Fixed(f64),
    /// Pick the exponent by maximum likelihood on the training series.
    Auto,
}

impl Default for Lambda {
    fn default() -> Self {
        Lambda::Fixed(1.0)
    }
}

/// Exponent actually applied to a fitted series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    lambda: f64,
}

impl TransformState {
    /// Resolve a [`Lambda`] choice against the training values.
    pub fn resolve(choice: Lambda, series: &[f64]) -> Result<Self> {
        let lambda = match choice {
            Lambda::Fixed(l) => l,
            Lambda::Auto => modulus_lambda(series),
        };
        if !lambda.is_finite() {
            return Err(ForecastError::InvalidConfiguration(format!(
                "lambda must be finite, got {}",
                lambda
            )));
        }
        Ok(Self { lambda })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn is_identity(&self) -> bool {
        self.lambda == 1.0
    }

    pub fn apply(&self, series: &[f64]) -> Vec<f64> {
        modulus(series, self.lambda)
    }

    pub fn invert(&self, series: &[f64]) -> Vec<f64> {
        inv_modulus(series, self.lambda)
    }
}

/// Apply the modulus transformation with a given lambda.
///
/// For lambda != 0: y = sign(x) * ((|x| + 1)^lambda - 1) / lambda
/// For lambda == 0: y = sign(x) * ln(|x| + 1)
///
/// Lambda of exactly 1 returns the input unchanged.
pub fn modulus(series: &[f64], lambda: f64) -> Vec<f64> {
    if lambda == 1.0 {
        return series.to_vec();
    }
    series
        .iter()
        .map(|&x| {
            let magnitude = if lambda.abs() < 1e-10 {
                x.abs().ln_1p()
            } else {
                ((x.abs() + 1.0).powf(lambda) - 1.0) / lambda
            };
            x.signum() * magnitude
        })
        .collect()
}

/// Inverse modulus transformation.
///
/// For lambda != 0: x = sign(y) * ((|y| * lambda + 1)^(1/lambda) - 1)
/// For lambda == 0: x = sign(y) * (exp(|y|) - 1)
///
/// Values outside the transform's range (possible for negative lambda)
/// map to NaN.
pub fn inv_modulus(transformed: &[f64], lambda: f64) -> Vec<f64> {
    if lambda == 1.0 {
        return transformed.to_vec();
    }
    transformed
        .iter()
        .map(|&y| {
            if lambda.abs() < 1e-10 {
                y.signum() * y.abs().exp_m1()
            } else {
                let base = y.abs() * lambda + 1.0;
                if base <= 0.0 {
                    f64::NAN
                } else {
                    y.signum() * (base.powf(1.0 / lambda) - 1.0)
                }
            }
        })
        .collect()
}

/// Find a modulus lambda by maximum likelihood.
///
/// Searches [-1, 2] for the exponent maximising the normal profile
/// log-likelihood of the transformed data, including the log-Jacobian.
pub fn modulus_lambda(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 1.0;
    }

    let mut best_lambda = 1.0;
    let mut best_llf = modulus_llf(series, 1.0);

    for i in -100..=200 {
        let lambda = i as f64 / 100.0;
        let llf = modulus_llf(series, lambda);

        if llf > best_llf {
            best_llf = llf;
            best_lambda = lambda;
        }
    }

    // Refine around the coarse optimum
    let start = (best_lambda - 0.01).max(-1.0);
    let end = (best_lambda + 0.01).min(2.0);

    for i in 0..=20 {
        let lambda = start + (end - start) * i as f64 / 20.0;
        let llf = modulus_llf(series, lambda);

        if llf > best_llf {
            best_llf = llf;
            best_lambda = lambda;
        }
    }

    best_lambda
}

/// Profile log-likelihood of the modulus transform (constants dropped).
fn modulus_llf(series: &[f64], lambda: f64) -> f64 {
    let n = series.len();
    let transformed = modulus(series, lambda);

    if transformed.iter().any(|x| !x.is_finite()) {
        return f64::NEG_INFINITY;
    }

    let mean = transformed.iter().sum::<f64>() / n as f64;
    let variance = transformed.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    if variance <= 0.0 {
        return f64::NEG_INFINITY;
    }

    // d/dx of the transform is (|x| + 1)^(lambda - 1)
    let log_jacobian: f64 = series.iter().map(|x| x.abs().ln_1p()).sum();

    -0.5 * n as f64 * variance.ln() + (lambda - 1.0) * log_jacobian
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lambda_1_is_identity() {
        let series = vec![-3.5, 0.0, 1.0, 2.25, 1e6];
        assert_eq!(modulus(&series, 1.0), series);
        assert_eq!(inv_modulus(&series, 1.0), series);
    }

    #[test]
    fn lambda_0_is_signed_log() {
        let series = vec![-2.0, 0.0, 3.0];
        let result = modulus(&series, 0.0);

        assert_relative_eq!(result[0], -(3.0_f64.ln()), epsilon = 1e-12);
        assert_relative_eq!(result[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(result[2], 4.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn lambda_half_known_values() {
        // (|x| + 1)^0.5 - 1) / 0.5
        let result = modulus(&[3.0, -8.0], 0.5);
        assert_relative_eq!(result[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(result[1], -4.0, epsilon = 1e-12);
    }

    #[test]
    fn transform_is_odd_and_monotone() {
        let series: Vec<f64> = (-20..=20).map(|i| i as f64 * 0.5).collect();
        for &lambda in &[-0.5, 0.0, 0.3, 1.7] {
            let t = modulus(&series, lambda);
            for w in t.windows(2) {
                assert!(w[1] > w[0]);
            }
            for (i, &x) in series.iter().enumerate() {
                let mirrored = modulus(&[-x], lambda)[0];
                assert_relative_eq!(mirrored, -t[i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn roundtrip_recovers_values_with_negatives() {
        let series = vec![-100.0, -1.5, -0.001, 0.0, 0.2, 7.0, 12345.0];
        for &lambda in &[-0.8, -0.2, 0.0, 0.25, 0.5, 1.5, 2.0] {
            let recovered = inv_modulus(&modulus(&series, lambda), lambda);
            for (orig, rec) in series.iter().zip(recovered.iter()) {
                assert_relative_eq!(orig, rec, epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn inverse_out_of_range_is_nan() {
        // For lambda = -0.5 the transform never exceeds 2 in magnitude
        let result = inv_modulus(&[3.0], -0.5);
        assert!(result[0].is_nan());
    }

    #[test]
    fn lambda_search_prefers_log_for_exponential_growth() {
        let series: Vec<f64> = (1..=30).map(|i| (0.3 * i as f64).exp()).collect();
        let lambda = modulus_lambda(&series);
        assert!(
            lambda < 0.5,
            "expected a compressing lambda for exponential data, got {}",
            lambda
        );
    }

    #[test]
    fn lambda_search_stays_in_range() {
        let series = vec![-5.0, 3.0, 0.0, 8.0, -2.0, 4.0, 1.0];
        let lambda = modulus_lambda(&series);
        assert!((-1.0..=2.0).contains(&lambda));
    }

    #[test]
    fn state_resolves_auto_and_rejects_non_finite() {
        let series: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let state = TransformState::resolve(Lambda::Auto, &series).unwrap();
        let recovered = state.invert(&state.apply(&series));
        for (orig, rec) in series.iter().zip(recovered.iter()) {
            assert_relative_eq!(orig, rec, epsilon = 1e-8);
        }

        assert!(TransformState::resolve(Lambda::Fixed(1.0), &series)
            .unwrap()
            .is_identity());
        assert!(matches!(
            TransformState::resolve(Lambda::Fixed(f64::NAN), &series),
            Err(ForecastError::InvalidConfiguration(_))
        ));
    }
}
