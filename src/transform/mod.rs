//! Reversible series transformations.
//!
//! Provides the modulus power transform for variance stabilisation and
//! differencing for trend removal, each paired with its inverse.
//!
//! # Example
//!
//! ```
//! use lagboost::transform::{difference, inv_modulus, modulus, TrendState};
//!
//! let series = vec![-2.0, 0.0, 3.0, 8.0];
//!
//! let stabilised = modulus(&series, 0.5);
//! let recovered = inv_modulus(&stabilised, 0.5);
//! assert!((recovered[3] - 8.0).abs() < 1e-9);
//!
//! let diffs = difference(&series, 1).unwrap();
//! let rebuilt = TrendState::leading(&series, 1).unwrap().integrate(&diffs);
//! assert_eq!(rebuilt, vec![0.0, 3.0, 8.0]);
//! ```

pub mod diff;
pub mod modulus;

pub use diff::{difference, integrate, ndiffs, TrendState, MAX_DIFF_ORDER};
pub use modulus::{inv_modulus, modulus, modulus_lambda, Lambda, TransformState};
