//! Differencing and integration for trend removal.

use crate::error::{ForecastError, Result};

/// Highest differencing order supported by the pipeline.
pub const MAX_DIFF_ORDER: usize = 2;

/// Apply differencing to a series.
///
/// # Arguments
/// * `series` - The input series
/// * `order` - Differencing order (0, 1 or 2)
///
/// # Returns
/// The differenced series, `order` observations shorter than the input.
pub fn difference(series: &[f64], order: usize) -> Result<Vec<f64>> {
    check_order(order)?;
    if series.len() <= order {
        return Err(ForecastError::InsufficientData {
            needed: order + 1,
            got: series.len(),
        });
    }

    let mut result = series.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    Ok(result)
}

/// Values needed to undo differencing from a given point in the series.
///
/// `seed[0]` is the level just before the first differenced value to be
/// integrated; for order 2, `seed[1]` is the first difference at that level.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendState {
    order: usize,
    seed: Vec<f64>,
}

impl TrendState {
    /// No differencing.
    pub fn none() -> Self {
        Self {
            order: 0,
            seed: Vec::new(),
        }
    }

    /// Seed for continuing `series` past its last observation.
    pub fn trailing(series: &[f64], order: usize) -> Result<Self> {
        check_order(order)?;
        let n = series.len();
        if n < order {
            return Err(ForecastError::InsufficientData {
                needed: order,
                got: n,
            });
        }
        let seed = match order {
            0 => Vec::new(),
            1 => vec![series[n - 1]],
            _ => vec![series[n - 1], series[n - 1] - series[n - 2]],
        };
        Ok(Self { order, seed })
    }

    /// Seed for rebuilding `series[order..]` from `difference(series, order)`.
    pub fn leading(series: &[f64], order: usize) -> Result<Self> {
        check_order(order)?;
        if series.len() < order {
            return Err(ForecastError::InsufficientData {
                needed: order,
                got: series.len(),
            });
        }
        let seed = match order {
            0 => Vec::new(),
            1 => vec![series[0]],
            _ => vec![series[1], series[1] - series[0]],
        };
        Ok(Self { order, seed })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn seed(&self) -> &[f64] {
        &self.seed
    }

    /// Integrate differenced values starting from this state's seed.
    pub fn integrate(&self, differenced: &[f64]) -> Vec<f64> {
        integrate(differenced, self)
    }
}

/// Integrate (reverse differencing) a differenced series.
///
/// # Arguments
/// * `differenced` - Values at the differenced level
/// * `state` - Order and seed values describing where integration starts
///
/// # Returns
/// Levels, one per differenced value.
pub fn integrate(differenced: &[f64], state: &TrendState) -> Vec<f64> {
    match state.order {
        0 => differenced.to_vec(),
        1 => cumsum_from(state.seed[0], differenced),
        _ => {
            let first_diffs = cumsum_from(state.seed[1], differenced);
            cumsum_from(state.seed[0], &first_diffs)
        }
    }
}

fn cumsum_from(init: f64, values: &[f64]) -> Vec<f64> {
    let mut acc = init;
    values
        .iter()
        .map(|&v| {
            acc += v;
            acc
        })
        .collect()
}

fn check_order(order: usize) -> Result<()> {
    if order > MAX_DIFF_ORDER {
        return Err(ForecastError::InvalidConfiguration(format!(
            "differencing order must be at most {}, got {}",
            MAX_DIFF_ORDER, order
        )));
    }
    Ok(())
}

/// Estimate the number of differences needed for level stationarity.
///
/// Repeatedly applies a KPSS test and differences while the null of
/// stationarity is rejected, up to `max_order` differences.
pub fn ndiffs(series: &[f64], max_order: usize) -> usize {
    let max_order = max_order.min(MAX_DIFF_ORDER);
    let mut current = series.to_vec();
    let mut order = 0;

    while order < max_order && current.len() > 4 && !kpss_is_stationary(&current) {
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
        order += 1;
    }

    order
}

/// KPSS level-stationarity test at the 5% level.
fn kpss_is_stationary(series: &[f64]) -> bool {
    let n = series.len();

    // Bandwidth: 4 * (n/100)^0.25
    let lags = (4.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize;
    let lags = lags.min(n / 2).max(1);

    let mean: f64 = series.iter().sum::<f64>() / n as f64;
    let residuals: Vec<f64> = series.iter().map(|&x| x - mean).collect();

    let mut partial = 0.0;
    let numerator: f64 = residuals
        .iter()
        .map(|&r| {
            partial += r;
            partial * partial
        })
        .sum::<f64>()
        / (n * n) as f64;

    // HAC long-run variance with Bartlett weights
    let mut variance = residuals.iter().map(|&r| r * r).sum::<f64>() / n as f64;
    for j in 1..=lags {
        let weight = 1.0 - j as f64 / (lags + 1) as f64;
        let autocovar: f64 = residuals
            .iter()
            .skip(j)
            .zip(residuals.iter())
            .map(|(&a, &b)| a * b)
            .sum::<f64>()
            / n as f64;
        variance += 2.0 * weight * autocovar;
    }

    if variance <= 1e-12 {
        return true;
    }

    numerator / variance < 0.463
}
