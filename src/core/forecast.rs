//! Forecast result structure for holding predictions.

use crate::core::Series;
use chrono::{DateTime, Utc};

/// A forecast: point predictions plus the in-sample context they came from.
#[derive(Debug, Clone)]
pub struct Forecast {
    method: String,
    point: Vec<f64>,
    original: Option<Series>,
    fitted: Vec<f64>,
    timestamps: Option<Vec<DateTime<Utc>>>,
}

impl Forecast {
    /// Create a forecast from point predictions only.
    pub fn from_values(method: impl Into<String>, point: Vec<f64>) -> Self {
        Self {
            method: method.into(),
            point,
            original: None,
            fitted: Vec::new(),
            timestamps: None,
        }
    }

    /// Attach the series the model was fitted on and its in-sample fitted values.
    ///
    /// Future timestamps are derived from the series calendar when present.
    pub fn with_history(mut self, original: Series, fitted: Vec<f64>) -> Self {
        self.timestamps = original.future_timestamps(self.point.len());
        self.original = Some(original);
        self.fitted = fitted;
        self
    }

    /// Label of the model that produced the forecast.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Point predictions.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn original(&self) -> Option<&Series> {
        self.original.as_ref()
    }

    /// In-sample one-step fitted values on the original scale.
    ///
    /// Observations without a full lag history are NaN.
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Original minus fitted, NaN where fitted is undefined.
    pub fn residuals(&self) -> Vec<f64> {
        match &self.original {
            Some(series) => series
                .values()
                .iter()
                .zip(self.fitted.iter())
                .map(|(y, f)| y - f)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Timestamps of each forecast step, if the series carried a calendar.
    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn forecast_from_values_has_no_history() {
        let forecast = Forecast::from_values("Naive", vec![1.0, 2.0, 3.0]);

        assert_eq!(forecast.method(), "Naive");
        assert_eq!(forecast.horizon(), 3);
        assert!(!forecast.is_empty());
        assert!(forecast.original().is_none());
        assert!(forecast.residuals().is_empty());
        assert!(forecast.timestamps().is_none());
    }

    #[test]
    fn forecast_with_history_computes_residuals() {
        let series = Series::new(vec![1.0, 2.0, 4.0], 1).unwrap();
        let forecast = Forecast::from_values("Test", vec![5.0])
            .with_history(series, vec![f64::NAN, 1.5, 3.0]);

        let residuals = forecast.residuals();
        assert!(residuals[0].is_nan());
        assert_eq!(&residuals[1..], &[0.5, 1.0]);
    }

    #[test]
    fn forecast_timestamps_follow_series_calendar() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series = Series::builder()
            .values(vec![1.0, 2.0])
            .calendar(start, Duration::hours(1))
            .build()
            .unwrap();

        let forecast =
            Forecast::from_values("Test", vec![3.0, 4.0]).with_history(series, vec![f64::NAN; 2]);
        let ts = forecast.timestamps().unwrap();
        assert_eq!(ts, &[start + Duration::hours(2), start + Duration::hours(3)]);
    }
}
