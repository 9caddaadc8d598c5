//! Classical multiplicative seasonal decomposition.
//!
//! The trend is a centred moving average of order `period` (a 2 x `period`
//! average when the period is even). Ratios of the series to the trend are
//! averaged per cycle position and normalised to a mean of one.

use crate::error::{ForecastError, Result};

/// Result of a classical multiplicative decomposition.
#[derive(Debug, Clone)]
pub struct DecompositionResult {
    /// Centred moving average trend; NaN where the window is incomplete.
    pub trend: Vec<f64>,
    /// Seasonal index for each observation.
    pub seasonal: Vec<f64>,
    /// Seasonal index per cycle position, `indices[p]` for position `p`.
    pub indices: Vec<f64>,
}

/// Decompose `series` multiplicatively.
///
/// # Arguments
/// * `series` - Observations, at least two full cycles
/// * `period` - Observations per cycle (at least 2)
/// * `cycle_position` - Cycle position of the first observation
pub fn decompose_multiplicative(
    series: &[f64],
    period: usize,
    cycle_position: usize,
) -> Result<DecompositionResult> {
    if period < 2 {
        return Err(ForecastError::InvalidConfiguration(format!(
            "decomposition needs a period of at least 2, got {}",
            period
        )));
    }
    let n = series.len();
    if n < 2 * period {
        return Err(ForecastError::InsufficientData {
            needed: 2 * period,
            got: n,
        });
    }

    let trend = centred_moving_average(series, period);

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, (&y, &t)) in series.iter().zip(trend.iter()).enumerate() {
        if t.is_nan() {
            continue;
        }
        if t.abs() < 1e-12 {
            return Err(ForecastError::Computation(
                "moving-average trend is zero; multiplicative decomposition is undefined"
                    .to_string(),
            ));
        }
        let pos = (cycle_position + i) % period;
        sums[pos] += y / t;
        counts[pos] += 1;
    }

    let raw: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| s / c as f64)
        .collect();
    let mean = raw.iter().sum::<f64>() / period as f64;
    let indices: Vec<f64> = raw.iter().map(|&r| r / mean).collect();

    if indices.iter().any(|&s| !s.is_finite() || s <= 0.0) {
        return Err(ForecastError::Computation(
            "seasonal indices must be positive; the series changes sign".to_string(),
        ));
    }

    let seasonal = (0..n)
        .map(|i| indices[(cycle_position + i) % period])
        .collect();

    Ok(DecompositionResult {
        trend,
        seasonal,
        indices,
    })
}

/// Centred moving average of order `period`.
fn centred_moving_average(series: &[f64], period: usize) -> Vec<f64> {
    let n = series.len();
    let half = period / 2;
    let mut trend = vec![f64::NAN; n];

    if period % 2 == 1 {
        for i in half..n - half {
            trend[i] = series[i - half..=i + half].iter().sum::<f64>() / period as f64;
        }
    } else {
        // 2 x period: half weights on the two outermost observations
        for i in half..n - half {
            let inner: f64 = series[i - half + 1..i + half].iter().sum();
            let edges = 0.5 * (series[i - half] + series[i + half]);
            trend[i] = (inner + edges) / period as f64;
        }
    }

    trend
}
