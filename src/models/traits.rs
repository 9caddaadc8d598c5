//! Traits defining the seams between the pipeline, learners and models.

use crate::core::{Forecast, Series};
use crate::error::{ForecastError, Result};
use crate::features::DesignMatrix;

/// How many boosting rounds a learner trains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundsSelection {
    /// k-fold cross-validation over design-matrix rows; the round with the
    /// lowest mean held-out RMSE is kept.
    CrossValidation { folds: usize, max_rounds: usize },
    /// Hold out the last `fraction` of rows and keep the best round on them.
    Validation { fraction: f64, max_rounds: usize },
    /// Train exactly `rounds` rounds.
    Manual { rounds: usize },
}

impl Default for RoundsSelection {
    fn default() -> Self {
        RoundsSelection::CrossValidation {
            folds: 5,
            max_rounds: 100,
        }
    }
}

impl RoundsSelection {
    /// Check the selection parameters.
    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            RoundsSelection::CrossValidation { folds, max_rounds } => folds >= 2 && max_rounds >= 1,
            RoundsSelection::Validation {
                fraction,
                max_rounds,
            } => fraction > 0.0 && fraction < 1.0 && max_rounds >= 1,
            RoundsSelection::Manual { rounds } => rounds >= 1,
        };
        if ok {
            Ok(())
        } else {
            Err(ForecastError::InvalidConfiguration(format!(
                "invalid rounds selection {:?}",
                self
            )))
        }
    }
}

/// A tabular regression learner.
///
/// The pipeline hands over the lagged design matrix and its targets and only
/// ever uses the returned model through [`FittedModel`].
pub trait ModelAdapter {
    type Fitted: FittedModel;

    /// Train on `matrix` rows against `target`.
    fn fit(
        &self,
        matrix: &DesignMatrix,
        target: &[f64],
        rounds: &RoundsSelection,
    ) -> Result<Self::Fitted>;
}

/// A trained learner producing one prediction per feature row.
pub trait FittedModel {
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Relative importance per design-matrix column, when the learner has one.
    fn feature_importance(&self) -> Option<Vec<f64>> {
        None
    }
}

/// Common interface for all forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the series.
    fn fit(&mut self, series: &Series) -> Result<()>;

    /// Generate point predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// In-sample fitted values on the original scale.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    fn name(&self) -> &str;

    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use lagboost::models::{BoxedForecaster, Forecaster};
/// use lagboost::models::baseline::Naive;
///
/// let model: BoxedForecaster = Box::new(Naive::new());
/// assert_eq!(model.name(), "Naive");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;

/// Named model factory used by the benchmark runner.
///
/// Every call to [`ModelSpec::create`] yields a fresh, unfitted model, so
/// one spec can be fitted on many series concurrently.
///
/// # Example
///
/// ```
/// use lagboost::models::ModelSpec;
/// use lagboost::models::baseline::{Naive, SeasonalNaive};
///
/// let specs = vec![
///     ModelSpec::new("naive", || Box::new(Naive::new())),
///     ModelSpec::new("snaive", || Box::new(SeasonalNaive::new())),
/// ];
///
/// for spec in &specs {
///     assert!(!spec.create().is_fitted());
/// }
/// ```
pub struct ModelSpec {
    name: String,
    factory: Box<dyn Fn() -> BoxedForecaster + Send + Sync>,
}

impl ModelSpec {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> BoxedForecaster + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Box::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a new model instance.
    pub fn create(&self) -> BoxedForecaster {
        (self.factory)()
    }
}

impl std::fmt::Debug for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSpec").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::baseline::Naive;

    fn trend_series(n: usize) -> Series {
        Series::new((1..=n).map(|i| i as f64).collect(), 1).unwrap()
    }

    #[test]
    fn default_rounds_selection_is_five_fold() {
        assert_eq!(
            RoundsSelection::default(),
            RoundsSelection::CrossValidation {
                folds: 5,
                max_rounds: 100
            }
        );
    }

    #[test]
    fn rounds_selection_validation() {
        assert!(RoundsSelection::default().validate().is_ok());
        assert!(RoundsSelection::Manual { rounds: 0 }.validate().is_err());
        assert!(RoundsSelection::CrossValidation {
            folds: 1,
            max_rounds: 10
        }
        .validate()
        .is_err());
        assert!(RoundsSelection::Validation {
            fraction: 1.0,
            max_rounds: 10
        }
        .validate()
        .is_err());
    }

    #[test]
    fn boxed_forecaster_fit_predict() {
        let mut model: BoxedForecaster = Box::new(Naive::new());
        assert!(!model.is_fitted());

        model.fit(&trend_series(20)).unwrap();
        assert!(model.is_fitted());
        assert_eq!(model.predict(5).unwrap().horizon(), 5);
        assert_eq!(model.residuals().unwrap().len(), 20);
    }

    #[test]
    fn model_spec_creates_independent_instances() {
        let spec = ModelSpec::new("naive", || Box::new(Naive::new()));
        assert_eq!(spec.name(), "naive");

        let mut first = spec.create();
        let second = spec.create();
        first.fit(&trend_series(10)).unwrap();

        assert!(first.is_fitted());
        assert!(!second.is_fitted());
    }
}
