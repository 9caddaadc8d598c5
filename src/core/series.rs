//! Series and regressor containers.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};

/// A univariate series with a seasonal frequency.
///
/// Values are never mutated after construction; every pipeline stage derives
/// a new `Series` that keeps the sampling metadata aligned with its values.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Vec<f64>,
    /// Observations per seasonal cycle.
    frequency: usize,
    /// Position of the first observation within the seasonal cycle.
    cycle_position: usize,
    name: String,
    start: Option<DateTime<Utc>>,
    step: Option<Duration>,
}

/// Builder for constructing a [`Series`].
#[derive(Debug, Clone)]
pub struct SeriesBuilder {
    values: Vec<f64>,
    frequency: usize,
    cycle_position: usize,
    name: String,
    start: Option<DateTime<Utc>>,
    step: Option<Duration>,
}

impl Default for SeriesBuilder {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            frequency: 1,
            cycle_position: 0,
            name: "y".to_string(),
            start: None,
            step: None,
        }
    }
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    pub fn frequency(mut self, frequency: usize) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the cycle position of the first observation (0-based).
    pub fn cycle_position(mut self, position: usize) -> Self {
        self.cycle_position = position;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach calendar metadata used to timestamp forecasts.
    pub fn calendar(mut self, start: DateTime<Utc>, step: Duration) -> Self {
        self.start = Some(start);
        self.step = Some(step);
        self
    }

    pub fn build(self) -> Result<Series> {
        if self.values.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }
        if self.frequency == 0 {
            return Err(ForecastError::InvalidConfiguration(
                "frequency must be at least 1".to_string(),
            ));
        }
        if self.cycle_position >= self.frequency {
            return Err(ForecastError::InvalidConfiguration(format!(
                "cycle position {} must be below frequency {}",
                self.cycle_position, self.frequency
            )));
        }
        if self.name.is_empty() {
            return Err(ForecastError::InvalidConfiguration(
                "series name must not be empty".to_string(),
            ));
        }
        if let Some(step) = self.step {
            if step <= Duration::zero() {
                return Err(ForecastError::InvalidConfiguration(
                    "calendar step must be positive".to_string(),
                ));
            }
        }

        Ok(Series {
            values: self.values,
            frequency: self.frequency,
            cycle_position: self.cycle_position,
            name: self.name,
            start: self.start,
            step: self.step,
        })
    }
}

impl Series {
    /// Create a series starting at cycle position 0.
    pub fn new(values: Vec<f64>, frequency: usize) -> Result<Self> {
        SeriesBuilder::new()
            .values(values)
            .frequency(frequency)
            .build()
    }

    pub fn builder() -> SeriesBuilder {
        SeriesBuilder::new()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn frequency(&self) -> usize {
        self.frequency
    }

    pub fn cycle_position(&self) -> usize {
        self.cycle_position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn step(&self) -> Option<Duration> {
        self.step
    }

    /// Cycle position of the observation at `index`. Indices past the end
    /// refer to future periods.
    pub fn position_at(&self, index: usize) -> usize {
        (self.cycle_position + index) % self.frequency
    }

    /// Derive a series whose first value sits `offset` periods after this
    /// series' first value, carrying the sampling metadata along.
    pub fn derive(&self, offset: usize, values: Vec<f64>) -> Series {
        Series {
            values,
            frequency: self.frequency,
            cycle_position: self.position_at(offset),
            name: self.name.clone(),
            start: self.timestamp_at(offset),
            step: self.step,
        }
    }

    /// Extract observations `start..end` as a new series.
    pub fn slice(&self, start: usize, end: usize) -> Result<Series> {
        if start >= end {
            return Err(ForecastError::InvalidConfiguration(
                "slice start must be below end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.len(),
                got: end,
            });
        }
        Ok(self.derive(start, self.values[start..end].to_vec()))
    }

    /// Timestamp of the observation at `index`, if calendar metadata is set
    /// and the offset stays within the representable date range.
    pub fn timestamp_at(&self, index: usize) -> Option<DateTime<Utc>> {
        let (start, step) = (self.start?, self.step?);
        let offset = step.checked_mul(i32::try_from(index).ok()?)?;
        start.checked_add_signed(offset)
    }

    /// Timestamps of the `horizon` periods following the last observation.
    pub fn future_timestamps(&self, horizon: usize) -> Option<Vec<DateTime<Utc>>> {
        (self.len()..self.len() + horizon)
            .map(|i| self.timestamp_at(i))
            .collect()
    }
}

/// A named regressor column.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressorColumn {
    name: String,
    values: Vec<f64>,
}

impl RegressorColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Ordered set of external regressor columns aligned with a response series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegressorSet {
    columns: Vec<RegressorColumn>,
}

impl RegressorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Names must be unique and lengths must agree.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ForecastError::InvalidConfiguration(
                "regressor name must not be empty".to_string(),
            ));
        }
        if self.columns.iter().any(|c| c.name == name) {
            return Err(ForecastError::InvalidConfiguration(format!(
                "duplicate regressor name '{}'",
                name
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }
        if let Some(first) = self.columns.first() {
            if first.values.len() != values.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: first.values.len(),
                    got: values.len(),
                });
            }
        }
        self.columns.push(RegressorColumn { name, values });
        Ok(self)
    }

    /// Number of rows (observations) per column.
    pub fn rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[RegressorColumn] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Drop the first `n` rows of every column.
    pub fn skip_rows(&self, n: usize) -> RegressorSet {
        RegressorSet {
            columns: self
                .columns
                .iter()
                .map(|c| RegressorColumn {
                    name: c.name.clone(),
                    values: c.values.iter().skip(n).copied().collect(),
                })
                .collect(),
        }
    }

    /// Keep only the first `n` rows of every column.
    pub fn take_rows(&self, n: usize) -> RegressorSet {
        RegressorSet {
            columns: self
                .columns
                .iter()
                .map(|c| RegressorColumn {
                    name: c.name.clone(),
                    values: c.values.iter().take(n).copied().collect(),
                })
                .collect(),
        }
    }

    /// Append the rows of `future` below this set's rows.
    ///
    /// Both sets must carry the same column names in the same order.
    pub fn extend_with(&self, future: &RegressorSet) -> Result<RegressorSet> {
        let same_layout = self.columns.len() == future.columns.len()
            && self
                .columns
                .iter()
                .zip(future.columns.iter())
                .all(|(a, b)| a.name == b.name);
        if !same_layout {
            return Err(ForecastError::InvalidConfiguration(
                "future regressors must have the same columns as the training regressors"
                    .to_string(),
            ));
        }

        Ok(RegressorSet {
            columns: self
                .columns
                .iter()
                .zip(future.columns.iter())
                .map(|(a, b)| RegressorColumn {
                    name: a.name.clone(),
                    values: a.values.iter().chain(b.values.iter()).copied().collect(),
                })
                .collect(),
        })
    }
}
