//! Error types for the lagboost library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while fitting or forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Configuration values are incompatible with each other or with the data.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Fewer future regressor rows than the forecast horizon.
    #[error("missing future regressors: need {needed} rows, got {got}")]
    MissingRegressor { needed: usize, got: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The model adapter failed to train.
    #[error("training failed: {0}")]
    Training(String),

    /// The fitted model failed to produce a prediction.
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    Computation(String),
}
