//! Configuration for the boosted autoregression pipeline.

use crate::error::{ForecastError, Result};
use crate::models::traits::RoundsSelection;
use crate::seasonality::SeasonalMethod;
use crate::transform::{Lambda, MAX_DIFF_ORDER};

/// Trend handling before lagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendMethod {
    /// Model the series level directly.
    #[default]
    None,
    /// Difference the series; order from `diff_order` or a KPSS test.
    Differencing,
}

/// Configuration for [`XgbAr`](super::XgbAr).
///
/// The seasonal frequency is taken from the fitted series.
#[derive(Debug, Clone, PartialEq)]
pub struct XgbArConfig {
    /// Number of lags. `None` picks `max(8, 2 * frequency)`.
    pub maxlag: Option<usize>,
    /// Minimum design-matrix rows kept when the default maxlag is reduced.
    pub min_training_rows: usize,
    /// Seasonal strategy.
    pub seas_method: SeasonalMethod,
    /// Fourier harmonics (K); only used by [`SeasonalMethod::Fourier`].
    pub harmonics: usize,
    /// Trend strategy.
    pub trend_method: TrendMethod,
    /// Differencing order. `None` chooses it automatically.
    pub diff_order: Option<usize>,
    /// Modulus transform exponent.
    pub lambda: Lambda,
    /// Boosting round selection.
    pub rounds: RoundsSelection,
}

impl Default for XgbArConfig {
    fn default() -> Self {
        Self {
            maxlag: None,
            min_training_rows: 1,
            seas_method: SeasonalMethod::Dummies,
            harmonics: 1,
            trend_method: TrendMethod::None,
            diff_order: None,
            lambda: Lambda::default(),
            rounds: RoundsSelection::default(),
        }
    }
}

impl XgbArConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maxlag(mut self, maxlag: usize) -> Self {
        self.maxlag = Some(maxlag);
        self
    }

    pub fn with_min_training_rows(mut self, rows: usize) -> Self {
        self.min_training_rows = rows;
        self
    }

    pub fn with_seasonal(mut self, method: SeasonalMethod) -> Self {
        self.seas_method = method;
        self
    }

    /// Use Fourier seasonality with `harmonics` sine/cosine pairs.
    pub fn with_fourier(mut self, harmonics: usize) -> Self {
        self.seas_method = SeasonalMethod::Fourier;
        self.harmonics = harmonics;
        self
    }

    pub fn with_trend(mut self, method: TrendMethod) -> Self {
        self.trend_method = method;
        self
    }

    /// Difference exactly `order` times (implies [`TrendMethod::Differencing`]).
    pub fn with_diff_order(mut self, order: usize) -> Self {
        self.trend_method = TrendMethod::Differencing;
        self.diff_order = Some(order);
        self
    }

    pub fn with_lambda(mut self, lambda: Lambda) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_rounds(mut self, rounds: RoundsSelection) -> Self {
        self.rounds = rounds;
        self
    }

    /// Check parameter ranges that do not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if self.maxlag == Some(0) {
            return Err(ForecastError::InvalidConfiguration(
                "maxlag must be at least 1".to_string(),
            ));
        }
        if self.seas_method == SeasonalMethod::Fourier && self.harmonics == 0 {
            return Err(ForecastError::InvalidConfiguration(
                "Fourier harmonics must be at least 1".to_string(),
            ));
        }
        if let Some(order) = self.diff_order {
            if order > MAX_DIFF_ORDER {
                return Err(ForecastError::InvalidConfiguration(format!(
                    "differencing order must be at most {}, got {}",
                    MAX_DIFF_ORDER, order
                )));
            }
        }
        if let Lambda::Fixed(l) = self.lambda {
            if !l.is_finite() {
                return Err(ForecastError::InvalidConfiguration(format!(
                    "lambda must be finite, got {}",
                    l
                )));
            }
        }
        self.rounds.validate()
    }
}
