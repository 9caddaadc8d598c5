//! Forecasting models.

mod traits;

pub mod baseline;
pub mod boosting;
pub mod xgbar;

pub use traits::{
    BoxedForecaster, FittedModel, Forecaster, ModelAdapter, ModelSpec, RoundsSelection,
};
pub use xgbar::{TrendMethod, XgbAr, XgbArConfig};
