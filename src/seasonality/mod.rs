//! Seasonal handling strategies.
//!
//! This module provides the interchangeable ways of dealing with a seasonal
//! cycle before lagging:
//! - Dummies: indicator columns per cycle position
//! - Fourier: sine/cosine pairs at harmonics of the frequency
//! - Decompose: classical multiplicative decomposition, divided out and
//!   multiplied back after forecasting

mod decompose;
mod dummies;
mod fourier;
mod method;

pub use decompose::{decompose_multiplicative, DecompositionResult};
pub use dummies::{dummy_names, dummy_row};
pub use fourier::{fourier_names, fourier_row};
pub use method::{SeasonalMethod, SeasonalState};
