//! Seasonal strategy selection and the state needed to undo it.

use crate::core::Series;
use crate::error::{ForecastError, Result};
use crate::seasonality::decompose::decompose_multiplicative;
use crate::seasonality::dummies::{dummy_names, dummy_row};
use crate::seasonality::fourier::{fourier_names, fourier_row};
use tracing::warn;

/// How seasonality is handled before lagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonalMethod {
    /// Append indicator columns for each non-reference cycle position.
    #[default]
    Dummies,
    /// Divide out multiplicative seasonal indices.
    Decompose,
    /// Append sine/cosine pairs at harmonics of the frequency.
    Fourier,
    /// Leave the series untouched.
    None,
}

/// Fitted seasonal strategy.
///
/// Encoding strategies (dummies, Fourier) leave the series unchanged and add
/// columns; decomposition rescales the series and must be undone after
/// forecasting.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonalState {
    None,
    Dummies { frequency: usize },
    Fourier { frequency: usize, harmonics: usize },
    Decompose { indices: Vec<f64> },
}

impl SeasonalState {
    /// Fit the strategy to `series` and return the adjusted series.
    ///
    /// A frequency of 1 has no seasonality to encode, so any method falls
    /// back to [`SeasonalState::None`].
    pub fn fit(method: SeasonalMethod, series: &Series, harmonics: usize) -> Result<(Self, Series)> {
        let frequency = series.frequency();

        if frequency < 2 && method != SeasonalMethod::None {
            warn!(
                ?method,
                frequency, "series has no seasonal cycle, seasonal handling disabled"
            );
            return Ok((SeasonalState::None, series.clone()));
        }

        match method {
            SeasonalMethod::None => Ok((SeasonalState::None, series.clone())),
            SeasonalMethod::Dummies => Ok((SeasonalState::Dummies { frequency }, series.clone())),
            SeasonalMethod::Fourier => {
                if harmonics == 0 || 2 * harmonics > frequency {
                    return Err(ForecastError::InvalidConfiguration(format!(
                        "Fourier harmonics must be between 1 and {} for frequency {}, got {}",
                        frequency / 2,
                        frequency,
                        harmonics
                    )));
                }
                Ok((
                    SeasonalState::Fourier {
                        frequency,
                        harmonics,
                    },
                    series.clone(),
                ))
            }
            SeasonalMethod::Decompose => {
                let result =
                    decompose_multiplicative(series.values(), frequency, series.cycle_position())?;
                let adjusted = series
                    .values()
                    .iter()
                    .zip(result.seasonal.iter())
                    .map(|(y, s)| y / s)
                    .collect();
                Ok((
                    SeasonalState::Decompose {
                        indices: result.indices,
                    },
                    series.derive(0, adjusted),
                ))
            }
        }
    }

    /// Number of feature columns this strategy contributes.
    pub fn n_columns(&self) -> usize {
        match self {
            SeasonalState::Dummies { frequency } => frequency - 1,
            SeasonalState::Fourier { harmonics, .. } => 2 * harmonics,
            SeasonalState::None | SeasonalState::Decompose { .. } => 0,
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        match self {
            SeasonalState::Dummies { frequency } => dummy_names(*frequency),
            SeasonalState::Fourier { harmonics, .. } => fourier_names(*harmonics),
            SeasonalState::None | SeasonalState::Decompose { .. } => Vec::new(),
        }
    }

    /// Feature values for an observation at cycle `position`.
    pub fn features_at(&self, position: usize) -> Vec<f64> {
        match self {
            SeasonalState::Dummies { frequency } => dummy_row(position, *frequency),
            SeasonalState::Fourier {
                frequency,
                harmonics,
            } => fourier_row(position, *frequency, *harmonics),
            SeasonalState::None | SeasonalState::Decompose { .. } => Vec::new(),
        }
    }

    /// Multiply seasonality back into values whose first element sits at
    /// cycle `first_position`. Identity for the encoding strategies.
    pub fn reseasonalize(&self, values: &[f64], first_position: usize) -> Vec<f64> {
        match self {
            SeasonalState::Decompose { indices } => {
                let period = indices.len();
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| v * indices[(first_position + i) % period])
                    .collect()
            }
            _ => values.to_vec(),
        }
    }

    /// Seasonal indices, if the decompose strategy is active.
    pub fn indices(&self) -> Option<&[f64]> {
        match self {
            SeasonalState::Decompose { indices } => Some(indices),
            _ => None,
        }
    }
}
