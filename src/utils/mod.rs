//! Utility functions for evaluating forecasts.

pub mod metrics;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use stats::{mean, median};
