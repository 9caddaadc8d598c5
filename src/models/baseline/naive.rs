//! Naive forecasting model.
//!
//! The naive method simply forecasts the last observed value for all future periods.

use crate::core::{Forecast, Series};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;

/// Naive forecaster that repeats the last value.
#[derive(Debug, Clone, Default)]
pub struct Naive {
    series: Option<Series>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl Naive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for Naive {
    fn fit(&mut self, series: &Series) -> Result<()> {
        let values = series.values();
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        // y_hat[t] = y[t-1]
        let fitted: Vec<f64> = std::iter::once(f64::NAN)
            .chain(values[..values.len() - 1].iter().copied())
            .collect();
        let residuals = values
            .iter()
            .zip(fitted.iter())
            .map(|(y, f)| y - f)
            .collect();

        self.series = Some(series.clone());
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let series = self.series.as_ref().ok_or(ForecastError::FitRequired)?;
        let last = series
            .values()
            .last()
            .copied()
            .ok_or(ForecastError::EmptyData)?;

        let fitted = self.fitted.clone().unwrap_or_default();
        Ok(Forecast::from_values(self.name(), vec![last; horizon])
            .with_history(series.clone(), fitted))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "Naive"
    }
}
