//! # lagboost
//!
//! Autoregressive forecasting with gradient-boosted trees.
//!
//! A series is optionally power-transformed, deseasonalized or given
//! seasonal regressors, differenced, and turned into a lagged design matrix
//! for a tabular learner. Forecasts are produced recursively and mapped back
//! to the original scale. Baseline models and a parallel benchmark runner
//! are included for evaluation.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)]

pub mod benchmark;
pub mod core;
pub mod error;
pub mod features;
pub mod models;
pub mod seasonality;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, RegressorSet, Series};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{Forecaster, RoundsSelection, TrendMethod, XgbAr, XgbArConfig};
    pub use crate::seasonality::SeasonalMethod;
    pub use crate::transform::Lambda;
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
