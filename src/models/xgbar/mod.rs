//! Boosted autoregressive forecasting.
//!
//! Lags a (optionally transformed, deseasonalized and differenced) series
//! into a design matrix, trains a tabular learner on it and forecasts
//! recursively, mapping predictions back through every stage.

mod config;
mod model;
mod reconstruct;

pub use config::{TrendMethod, XgbArConfig};
pub use model::XgbAr;
