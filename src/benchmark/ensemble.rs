//! Forecast combinations evaluated alongside the individual models.

use crate::core::Forecast;
use crate::error::{ForecastError, Result};

/// Equal-weight combination of other benchmarked models, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ensemble {
    name: String,
    members: Vec<String>,
}

impl Ensemble {
    pub fn new<S: Into<String>>(name: impl Into<String>, members: Vec<S>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Average member forecasts point by point.
    ///
    /// Fitted values are averaged the same way; a NaN in any member stays NaN.
    pub fn combine(&self, forecasts: &[&Forecast]) -> Result<Forecast> {
        let first = forecasts.first().ok_or(ForecastError::EmptyData)?;
        let horizon = first.horizon();
        if let Some(other) = forecasts.iter().find(|f| f.horizon() != horizon) {
            return Err(ForecastError::DimensionMismatch {
                expected: horizon,
                got: other.horizon(),
            });
        }

        let point = mean_columns(forecasts.iter().map(|f| f.point()), horizon);
        let combined = Forecast::from_values(self.name.clone(), point);
        Ok(match first.original() {
            Some(original) => {
                let fitted = mean_columns(forecasts.iter().map(|f| f.fitted()), original.len());
                combined.with_history(original.clone(), fitted)
            }
            None => combined,
        })
    }
}

fn mean_columns<'a>(rows: impl Iterator<Item = &'a [f64]>, width: usize) -> Vec<f64> {
    let mut sum = vec![0.0; width];
    let mut count = 0usize;
    for row in rows {
        for (s, v) in sum.iter_mut().zip(row.iter().chain(std::iter::repeat(&f64::NAN))) {
            *s += v;
        }
        count += 1;
    }
    sum.iter().map(|s| s / count as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Series;
    use approx::assert_relative_eq;

    #[test]
    fn combine_is_pointwise_mean() {
        let a = Forecast::from_values("a", vec![1.0, 2.0, 3.0]);
        let b = Forecast::from_values("b", vec![3.0, 4.0, 8.0]);
        let ensemble = Ensemble::new("combo", vec!["a", "b"]);

        let combined = ensemble.combine(&[&a, &b]).unwrap();
        assert_eq!(combined.method(), "combo");
        assert_eq!(combined.point(), &[2.0, 3.0, 5.5]);
    }

    #[test]
    fn combine_averages_fitted_values() {
        let series = Series::new(vec![1.0, 2.0, 3.0], 1).unwrap();
        let a = Forecast::from_values("a", vec![1.0])
            .with_history(series.clone(), vec![f64::NAN, 1.0, 2.0]);
        let b = Forecast::from_values("b", vec![3.0]).with_history(series, vec![0.0, 3.0, 4.0]);

        let combined = Ensemble::new("combo", vec!["a", "b"])
            .combine(&[&a, &b])
            .unwrap();
        assert!(combined.fitted()[0].is_nan());
        assert_relative_eq!(combined.fitted()[1], 2.0);
        assert_relative_eq!(combined.residuals()[2], 0.0);
    }

    #[test]
    fn combine_rejects_mismatched_horizons() {
        let a = Forecast::from_values("a", vec![1.0, 2.0]);
        let b = Forecast::from_values("b", vec![1.0]);
        assert_eq!(
            Ensemble::new("combo", vec!["a", "b"])
                .combine(&[&a, &b])
                .unwrap_err(),
            ForecastError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            Ensemble::new("combo", Vec::<String>::new())
                .combine(&[])
                .unwrap_err(),
            ForecastError::EmptyData
        );
    }
}
