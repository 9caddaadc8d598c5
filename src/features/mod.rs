//! Supervised feature construction from time series.
//!
//! Turns a response series and optional regressors into a lagged design
//! matrix for a tabular learner, and builds single rows for recursive
//! forecasting.
//!
//! # Example
//!
//! ```
//! use lagboost::features::build;
//!
//! let series: Vec<f64> = (1..=10).map(|i| i as f64).collect();
//! let (x, y) = build(&series, "y", None, 2).unwrap();
//!
//! assert_eq!(x.n_rows(), 8);
//! assert_eq!(x.row(0), &[2.0, 1.0]);
//! assert_eq!(y[0], 3.0);
//! ```

mod lags;

pub use lags::{build, build_one, default_maxlag, lag_feature_names, DesignMatrix};
