//! Boosted autoregression: transform, deseasonalize, difference, lag, learn.

use crate::core::{Forecast, RegressorSet, Series};
use crate::error::{ForecastError, Result};
use crate::features::{build, default_maxlag, DesignMatrix};
use crate::models::boosting::GradientBoostedTrees;
use crate::models::traits::{FittedModel, Forecaster, ModelAdapter};
use crate::models::xgbar::config::{TrendMethod, XgbArConfig};
use crate::models::xgbar::reconstruct::{Inversion, Reconstructor};
use crate::seasonality::SeasonalState;
use crate::transform::{difference, ndiffs, TransformState, TrendState, MAX_DIFF_ORDER};
use tracing::debug;

/// Autoregressive forecaster backed by a tabular learner.
///
/// Fitting runs the forward pipeline
/// transform → seasonal → trend → lag → learn and keeps every stage's state
/// so forecasts can be mapped back to the original scale.
///
/// # Example
///
/// ```
/// use lagboost::prelude::*;
///
/// let values: Vec<f64> = (0..48)
///     .map(|i| 10.0 + (i as f64 * std::f64::consts::PI / 6.0).sin())
///     .collect();
/// let series = Series::new(values, 12).unwrap();
///
/// let config = XgbArConfig::new()
///     .with_maxlag(12)
///     .with_rounds(RoundsSelection::Manual { rounds: 20 });
/// let mut model = XgbAr::new(config);
/// model.fit(&series).unwrap();
///
/// let forecast = model.predict(6).unwrap();
/// assert_eq!(forecast.horizon(), 6);
/// ```
pub struct XgbAr<A: ModelAdapter = GradientBoostedTrees> {
    config: XgbArConfig,
    adapter: A,
    fitted: Option<FittedPipeline<A::Fitted>>,
}

/// Everything kept from one fit.
struct FittedPipeline<M> {
    model: M,
    original: Series,
    transform: TransformState,
    seasonal: SeasonalState,
    /// Seed for integrating forecasts past the end of the series.
    trend: TrendState,
    /// Series on the model scale (transformed, deseasonalized, differenced).
    base: Series,
    regressors: Option<RegressorSet>,
    maxlag: usize,
    feature_names: Vec<String>,
    n_rows: usize,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

impl<A: ModelAdapter> std::fmt::Debug for XgbAr<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XgbAr")
            .field("config", &self.config)
            .field("maxlag", &self.maxlag())
            .field("diff_order", &self.diff_order())
            .field("fitted", &self.fitted.is_some())
            .finish()
    }
}

impl XgbAr<GradientBoostedTrees> {
    /// Create a model with the default boosted-tree learner.
    pub fn new(config: XgbArConfig) -> Self {
        Self::with_adapter(config, GradientBoostedTrees::default())
    }
}

impl Default for XgbAr<GradientBoostedTrees> {
    fn default() -> Self {
        Self::new(XgbArConfig::default())
    }
}

impl<A: ModelAdapter> XgbAr<A> {
    /// Create a model with a custom learner.
    pub fn with_adapter(config: XgbArConfig, adapter: A) -> Self {
        Self {
            config,
            adapter,
            fitted: None,
        }
    }

    pub fn config(&self) -> &XgbArConfig {
        &self.config
    }

    /// Fit on `series` with regressor columns aligned to it.
    pub fn fit_with_regressors(
        &mut self,
        series: &Series,
        regressors: Option<&RegressorSet>,
    ) -> Result<()> {
        self.fitted = None;
        self.config.validate()?;
        if let Some(set) = regressors {
            if set.rows() != series.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: series.len(),
                    got: set.rows(),
                });
            }
            if set.names().any(|name| name == series.name()) {
                return Err(ForecastError::InvalidConfiguration(format!(
                    "regressor '{}' has the same name as the response",
                    series.name()
                )));
            }
        }
        let regressors = regressors.filter(|set| !set.is_empty());

        let transform = TransformState::resolve(self.config.lambda, series.values())?;
        let transformed = series.derive(0, transform.apply(series.values()));

        let (seasonal, adjusted) =
            SeasonalState::fit(self.config.seas_method, &transformed, self.config.harmonics)?;

        let order = match self.config.trend_method {
            TrendMethod::None => 0,
            TrendMethod::Differencing => match self.config.diff_order {
                Some(order) => order,
                None => {
                    let order = ndiffs(adjusted.values(), MAX_DIFF_ORDER);
                    debug!(order, "selected differencing order");
                    order
                }
            },
        };
        let base = adjusted.derive(order, difference(adjusted.values(), order)?);
        let trend = TrendState::trailing(adjusted.values(), order)?;
        let aligned = regressors.map(|set| set.skip_rows(order));

        let maxlag = match self.config.maxlag {
            Some(maxlag) => maxlag,
            None => default_maxlag(
                base.len(),
                series.frequency(),
                self.config.min_training_rows,
            )?,
        };

        let (matrix, target) =
            design_matrix(&base, series.name(), aligned.as_ref(), &seasonal, maxlag)?;
        debug!(
            rows = matrix.n_rows(),
            columns = matrix.n_cols(),
            maxlag,
            "built design matrix"
        );

        let model = self.adapter.fit(&matrix, &target, &self.config.rounds)?;

        // One-step-ahead fitted values mapped back to the original scale
        let skip = order + maxlag;
        let mut fitted = vec![f64::NAN; series.len()];
        for (r, row) in matrix.rows().enumerate() {
            let j = skip + r;
            let pred = model.predict(row)?;
            let seed = TrendState::trailing(&adjusted.values()[..j], order)?;
            let inversion = Inversion {
                trend: &seed,
                seasonal: &seasonal,
                transform: &transform,
                first_position: series.position_at(j),
            };
            fitted[j] = inversion.apply(&[pred])[0];
        }
        let residuals = series
            .values()
            .iter()
            .zip(fitted.iter())
            .map(|(y, f)| y - f)
            .collect();

        self.fitted = Some(FittedPipeline {
            model,
            original: series.clone(),
            transform,
            seasonal,
            trend,
            base,
            regressors: aligned,
            maxlag,
            feature_names: matrix.names().to_vec(),
            n_rows: matrix.n_rows(),
            fitted,
            residuals,
        });
        Ok(())
    }

    /// Forecast `horizon` steps, supplying future regressor rows when the
    /// model was fitted with regressors.
    pub fn forecast_with_regressors(
        &self,
        horizon: usize,
        future: Option<&RegressorSet>,
    ) -> Result<Forecast> {
        let state = self.fitted.as_ref().ok_or(ForecastError::FitRequired)?;

        let model_scale = Reconstructor::new(
            &state.model,
            &state.seasonal,
            &state.base,
            state.maxlag,
            state.regressors.as_ref(),
            future,
            horizon,
        )?
        .run()?;

        let inversion = Inversion {
            trend: &state.trend,
            seasonal: &state.seasonal,
            transform: &state.transform,
            first_position: state.original.position_at(state.original.len()),
        };
        let point = inversion.apply(&model_scale);
        if point.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::Prediction(
                "forecast is not representable on the original scale".to_string(),
            ));
        }

        Ok(Forecast::from_values(self.name(), point)
            .with_history(state.original.clone(), state.fitted.clone()))
    }

    /// Feature names paired with the learner's importance scores.
    pub fn importance(&self) -> Option<Vec<(String, f64)>> {
        let state = self.fitted.as_ref()?;
        let scores = state.model.feature_importance()?;
        Some(state.feature_names.iter().cloned().zip(scores).collect())
    }

    /// Number of lags used by the fitted model.
    pub fn maxlag(&self) -> Option<usize> {
        self.fitted.as_ref().map(|s| s.maxlag)
    }

    /// Differencing order used by the fitted model.
    pub fn diff_order(&self) -> Option<usize> {
        self.fitted.as_ref().map(|s| s.trend.order())
    }

    /// Transform exponent used by the fitted model.
    pub fn lambda(&self) -> Option<f64> {
        self.fitted.as_ref().map(|s| s.transform.lambda())
    }

    pub fn seasonal_state(&self) -> Option<&SeasonalState> {
        self.fitted.as_ref().map(|s| &s.seasonal)
    }

    /// Design-matrix column names of the fitted model.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.fitted.as_ref().map(|s| s.feature_names.as_slice())
    }

    /// Rows and columns of the training design matrix.
    pub fn training_shape(&self) -> Option<(usize, usize)> {
        self.fitted
            .as_ref()
            .map(|s| (s.n_rows, s.feature_names.len()))
    }
}

/// Lag the model-scale series and append seasonal columns for each row's
/// target position.
fn design_matrix(
    base: &Series,
    response: &str,
    regressors: Option<&RegressorSet>,
    seasonal: &SeasonalState,
    maxlag: usize,
) -> Result<(DesignMatrix, Vec<f64>)> {
    let (matrix, target) = build(base.values(), response, regressors, maxlag)?;
    if seasonal.n_columns() == 0 {
        return Ok((matrix, target));
    }
    let extra = (maxlag..base.len())
        .map(|i| seasonal.features_at(base.position_at(i)))
        .collect();
    Ok((matrix.append_columns(seasonal.column_names(), extra)?, target))
}

impl<A: ModelAdapter> Forecaster for XgbAr<A> {
    fn fit(&mut self, series: &Series) -> Result<()> {
        self.fit_with_regressors(series, None)
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        self.forecast_with_regressors(horizon, None)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|s| s.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|s| s.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "XgbAr"
    }
}
