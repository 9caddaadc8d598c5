//! Recursive multi-step forecasting and inversion back to the original scale.
//!
//! The reconstructor walks the horizon one step at a time: each step lags
//! the history (observed values followed by the forecasts made so far),
//! predicts one value and appends it. Once the horizon is exhausted the new
//! values are integrated, reseasonalized and inverse-transformed, in that
//! order.

use crate::core::{RegressorSet, Series};
use crate::error::{ForecastError, Result};
use crate::features::build_one;
use crate::models::traits::FittedModel;
use crate::seasonality::SeasonalState;
use crate::transform::{TransformState, TrendState};

/// Stage inversions applied once every step has been predicted.
pub(crate) struct Inversion<'a> {
    pub trend: &'a TrendState,
    pub seasonal: &'a SeasonalState,
    pub transform: &'a TransformState,
    /// Cycle position of the first forecast period.
    pub first_position: usize,
}

impl Inversion<'_> {
    /// Undo trend, then seasonal, then transform.
    pub(crate) fn apply(&self, model_scale: &[f64]) -> Vec<f64> {
        let levels = self.trend.integrate(model_scale);
        let seasonal = self.seasonal.reseasonalize(&levels, self.first_position);
        self.transform.invert(&seasonal)
    }
}

/// Step-by-step recursive forecaster over the model-scale history.
pub(crate) struct Reconstructor<'a, M: FittedModel> {
    model: &'a M,
    seasonal: &'a SeasonalState,
    /// Series on the model scale; supplies cycle positions for future steps.
    base: &'a Series,
    regressors: Option<RegressorSet>,
    maxlag: usize,
    history: Vec<f64>,
    step: usize,
    horizon: usize,
}

impl<'a, M: FittedModel> Reconstructor<'a, M> {
    /// Set up a run of `horizon` steps.
    ///
    /// `past` are the regressor rows aligned with `base`; `future` must hold
    /// at least `horizon` rows with the same columns.
    pub(crate) fn new(
        model: &'a M,
        seasonal: &'a SeasonalState,
        base: &'a Series,
        maxlag: usize,
        past: Option<&RegressorSet>,
        future: Option<&RegressorSet>,
        horizon: usize,
    ) -> Result<Self> {
        let regressors = match (past, future) {
            (None, None) => None,
            (None, Some(_)) => {
                return Err(ForecastError::InvalidConfiguration(
                    "future regressors supplied to a model fitted without regressors".to_string(),
                ))
            }
            (Some(past), future) => {
                let got = future.map(RegressorSet::rows).unwrap_or(0);
                if got < horizon {
                    return Err(ForecastError::MissingRegressor {
                        needed: horizon,
                        got,
                    });
                }
                match future {
                    Some(future) => Some(past.extend_with(&future.take_rows(horizon))?),
                    None => Some(past.clone()),
                }
            }
        };

        Ok(Self {
            model,
            seasonal,
            base,
            regressors,
            maxlag,
            history: base.values().to_vec(),
            step: 0,
            horizon,
        })
    }

    pub(crate) fn is_done(&self) -> bool {
        self.step >= self.horizon
    }

    /// Predict the next step and append it to the history.
    pub(crate) fn advance(&mut self) -> Result<f64> {
        if self.is_done() {
            return Err(ForecastError::Prediction(format!(
                "forecast horizon of {} steps already reached",
                self.horizon
            )));
        }
        let at = self.history.len();
        let mut row = build_one(&self.history, self.regressors.as_ref(), self.maxlag, at)?;
        row.extend(self.seasonal.features_at(self.base.position_at(at)));

        let value = self.model.predict(&row)?;
        if !value.is_finite() {
            return Err(ForecastError::Prediction(format!(
                "non-finite prediction at step {}",
                self.step + 1
            )));
        }
        self.history.push(value);
        self.step += 1;
        Ok(value)
    }

    /// Run to completion and return the model-scale forecasts.
    pub(crate) fn run(mut self) -> Result<Vec<f64>> {
        while !self.is_done() {
            self.advance()?;
        }
        Ok(self.history.split_off(self.base.len()))
    }
}
