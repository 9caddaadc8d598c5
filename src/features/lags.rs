//! Lagged design matrix construction.
//!
//! Row `i - maxlag` of the matrix built from a series of length `N` holds the
//! target `y[i]` and the features `y[i-1], ..., y[i-maxlag]` followed by each
//! regressor column's values at the same lags, for `i = maxlag..N`.

use crate::core::RegressorSet;
use crate::error::{ForecastError, Result};
use tracing::warn;

/// Supervised feature table: rows x named columns, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    names: Vec<String>,
    data: Vec<f64>,
    n_rows: usize,
}

impl DesignMatrix {
    /// Build a matrix from row-major data.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_cols = names.len();
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for row in &rows {
            if row.len() != n_cols {
                return Err(ForecastError::DimensionMismatch {
                    expected: n_cols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            names,
            data,
            n_rows: rows.len(),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn row(&self, index: usize) -> &[f64] {
        let n_cols = self.n_cols();
        &self.data[index * n_cols..(index + 1) * n_cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n_cols() + col]
    }

    /// Row-major backing data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Return a new matrix with `extra` columns appended to every row.
    pub fn append_columns(&self, names: Vec<String>, extra: Vec<Vec<f64>>) -> Result<Self> {
        if extra.len() != self.n_rows {
            return Err(ForecastError::DimensionMismatch {
                expected: self.n_rows,
                got: extra.len(),
            });
        }
        let mut all_names = self.names.clone();
        all_names.extend(names);

        let rows = self
            .rows()
            .zip(extra)
            .map(|(row, more)| {
                let mut joined = row.to_vec();
                joined.extend(more);
                joined
            })
            .collect();
        Self::from_rows(all_names, rows)
    }
}

/// Feature names `<source>_lag<k>` for the response then each regressor.
pub fn lag_feature_names(
    response: &str,
    regressors: Option<&RegressorSet>,
    maxlag: usize,
) -> Vec<String> {
    let mut sources = vec![response.to_string()];
    if let Some(set) = regressors {
        sources.extend(set.names().map(str::to_string));
    }
    sources
        .iter()
        .flat_map(|s| (1..=maxlag).map(move |k| format!("{}_lag{}", s, k)))
        .collect()
}

/// Build the lagged design matrix and target vector.
///
/// # Arguments
/// * `series` - Response values
/// * `response` - Response name used for feature names
/// * `regressors` - Optional regressor columns aligned with `series`
/// * `maxlag` - Number of lags (at least 1, below the series length)
///
/// # Returns
/// The design matrix with `len - maxlag` rows and the matching targets.
pub fn build(
    series: &[f64],
    response: &str,
    regressors: Option<&RegressorSet>,
    maxlag: usize,
) -> Result<(DesignMatrix, Vec<f64>)> {
    let n = series.len();
    check_maxlag(maxlag, n)?;
    if let Some(set) = regressors {
        if set.rows() != n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: set.rows(),
            });
        }
    }

    let names = lag_feature_names(response, regressors, maxlag);
    let rows = (maxlag..n)
        .map(|i| lag_row(series, regressors, maxlag, i))
        .collect();
    let target = series[maxlag..].to_vec();

    Ok((DesignMatrix::from_rows(names, rows)?, target))
}

/// Build the single feature row predicting position `at`.
///
/// `history` may contain synthetic forecasts appended after the observed
/// values; `regressors` must cover every row up to `at - 1`.
pub fn build_one(
    history: &[f64],
    regressors: Option<&RegressorSet>,
    maxlag: usize,
    at: usize,
) -> Result<Vec<f64>> {
    if maxlag == 0 {
        return Err(ForecastError::InvalidConfiguration(
            "maxlag must be at least 1".to_string(),
        ));
    }
    if at < maxlag || at > history.len() {
        return Err(ForecastError::InsufficientData {
            needed: maxlag.max(at),
            got: history.len().min(at),
        });
    }
    if let Some(set) = regressors {
        if set.rows() < at {
            return Err(ForecastError::MissingRegressor {
                needed: at,
                got: set.rows(),
            });
        }
    }
    Ok(lag_row(history, regressors, maxlag, at))
}

fn lag_row(
    series: &[f64],
    regressors: Option<&RegressorSet>,
    maxlag: usize,
    at: usize,
) -> Vec<f64> {
    let width = maxlag * (1 + regressors.map(|r| r.n_columns()).unwrap_or(0));
    let mut row = Vec::with_capacity(width);
    row.extend((1..=maxlag).map(|k| series[at - k]));
    if let Some(set) = regressors {
        for column in set.columns() {
            let values = column.values();
            row.extend((1..=maxlag).map(|k| values[at - k]));
        }
    }
    row
}

fn check_maxlag(maxlag: usize, n: usize) -> Result<()> {
    if maxlag == 0 {
        return Err(ForecastError::InvalidConfiguration(
            "maxlag must be at least 1".to_string(),
        ));
    }
    if maxlag >= n {
        return Err(ForecastError::InvalidConfiguration(format!(
            "maxlag {} must be below the series length {}",
            maxlag, n
        )));
    }
    Ok(())
}

/// Choose a maxlag when none is configured.
///
/// The default is `max(8, 2 * frequency)`. When that would leave fewer than
/// `min_rows` training rows it is reduced, with a warning, to
/// `n - min_rows`.
pub fn default_maxlag(n: usize, frequency: usize, min_rows: usize) -> Result<usize> {
    let min_rows = min_rows.max(1);
    if n <= min_rows {
        return Err(ForecastError::InsufficientData {
            needed: min_rows + 1,
            got: n,
        });
    }

    let preferred = 8.max(2 * frequency);
    let cap = n - min_rows;
    if preferred > cap {
        warn!(
            preferred,
            reduced = cap,
            series_length = n,
            "default maxlag leaves too few training rows, reducing it"
        );
        return Ok(cap);
    }
    Ok(preferred)
}
