//! Seasonal Naive forecasting model.
//!
//! Forecasts by repeating the value from the same season in the previous cycle.

use crate::core::{Forecast, Series};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;

/// Seasonal Naive forecaster.
///
/// The period is taken from the fitted series' frequency; with a frequency
/// of 1 it reduces to [`Naive`](super::Naive).
#[derive(Debug, Clone, Default)]
pub struct SeasonalNaive {
    series: Option<Series>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl SeasonalNaive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seasonal period of the fitted series.
    pub fn period(&self) -> Option<usize> {
        self.series.as_ref().map(|s| s.frequency())
    }
}

impl Forecaster for SeasonalNaive {
    fn fit(&mut self, series: &Series) -> Result<()> {
        let period = series.frequency();
        let values = series.values();
        if values.len() < period {
            return Err(ForecastError::InsufficientData {
                needed: period,
                got: values.len(),
            });
        }

        // y_hat[t] = y[t - period]
        let fitted: Vec<f64> = (0..values.len())
            .map(|i| {
                if i < period {
                    f64::NAN
                } else {
                    values[i - period]
                }
            })
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
        let history = series.values();
        let period = series.frequency();
        let last_cycle = &history[history.len() - period..];

        let predictions = (0..horizon).map(|h| last_cycle[h % period]).collect();
        let fitted = self.fitted.clone().unwrap_or_default();
        Ok(Forecast::from_values(self.name(), predictions).with_history(series.clone(), fitted))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SeasonalNaive"
    }
}
