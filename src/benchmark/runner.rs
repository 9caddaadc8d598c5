//! Parallel evaluation of models over a collection of series.

use crate::benchmark::ensemble::Ensemble;
use crate::benchmark::report::BenchmarkReport;
use crate::core::{Forecast, Series};
use crate::error::{ForecastError, Result};
use crate::models::ModelSpec;
use crate::utils::{calculate_metrics, AccuracyMetrics};
use rayon::prelude::*;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A training series and the held-out values forecasts are scored on.
#[derive(Debug, Clone)]
pub struct BenchmarkSeries {
    pub id: String,
    pub train: Series,
    pub test: Vec<f64>,
}

impl BenchmarkSeries {
    pub fn new(id: impl Into<String>, train: Series, test: Vec<f64>) -> Result<Self> {
        if test.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if test.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }
        Ok(Self {
            id: id.into(),
            train,
            test,
        })
    }

    /// Hold out the last `test_len` observations of `series`.
    pub fn split(id: impl Into<String>, series: &Series, test_len: usize) -> Result<Self> {
        if test_len == 0 || test_len >= series.len() {
            return Err(ForecastError::InvalidConfiguration(format!(
                "test length {} must be between 1 and {}",
                test_len,
                series.len().saturating_sub(1)
            )));
        }
        let cut = series.len() - test_len;
        Self::new(
            id,
            series.slice(0, cut)?,
            series.values()[cut..].to_vec(),
        )
    }

    pub fn horizon(&self) -> usize {
        self.test.len()
    }
}

/// Shared flag that stops units which have not started yet.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one (series, model) unit.
#[derive(Debug, Clone)]
pub enum Outcome {
    Completed {
        forecast: Forecast,
        metrics: AccuracyMetrics,
    },
    Failed(String),
    Cancelled,
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    pub fn metrics(&self) -> Option<&AccuracyMetrics> {
        match self {
            Outcome::Completed { metrics, .. } => Some(metrics),
            _ => None,
        }
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            Outcome::Completed { forecast, .. } => Some(forecast),
            _ => None,
        }
    }
}

/// Outcome of one model on one series.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub series_id: String,
    pub model: String,
    pub outcome: Outcome,
}

/// Fits every model on every series and scores the forecasts.
///
/// # Example
///
/// ```
/// use lagboost::benchmark::{Benchmark, BenchmarkSeries, CancellationToken, Ensemble};
/// use lagboost::core::Series;
/// use lagboost::models::ModelSpec;
/// use lagboost::models::baseline::{Naive, SeasonalNaive};
///
/// let values: Vec<f64> = (0..40).map(|i| (i % 4) as f64 + i as f64 * 0.1).collect();
/// let series = Series::new(values, 4).unwrap();
/// let data = vec![BenchmarkSeries::split("s1", &series, 4).unwrap()];
///
/// let benchmark = Benchmark::new()
///     .with_model(ModelSpec::new("naive", || Box::new(Naive::new())))
///     .with_model(ModelSpec::new("snaive", || Box::new(SeasonalNaive::new())))
///     .with_ensemble(Ensemble::new("combo", vec!["naive", "snaive"]));
///
/// let report = benchmark.run(&data, &CancellationToken::new()).unwrap();
/// assert_eq!(report.results().len(), 3);
/// assert_eq!(report.summary()[0].model, "snaive");
/// ```
#[derive(Debug, Default)]
pub struct Benchmark {
    models: Vec<ModelSpec>,
    ensembles: Vec<Ensemble>,
}

impl Benchmark {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, spec: ModelSpec) -> Self {
        self.models.push(spec);
        self
    }

    pub fn with_ensemble(mut self, ensemble: Ensemble) -> Self {
        self.ensembles.push(ensemble);
        self
    }

    /// Run every (series, model) unit on the rayon pool, then combine
    /// ensembles from the member outcomes.
    ///
    /// A failing or panicking unit is recorded and never affects its
    /// siblings. Units that have not started when `cancel` fires are marked
    /// cancelled; finished units are kept.
    pub fn run(
        &self,
        series: &[BenchmarkSeries],
        cancel: &CancellationToken,
    ) -> Result<BenchmarkReport> {
        self.validate()?;
        info!(
            series = series.len(),
            models = self.models.len(),
            ensembles = self.ensembles.len(),
            "starting benchmark"
        );

        let units: Vec<(&BenchmarkSeries, &ModelSpec)> = series
            .iter()
            .flat_map(|s| self.models.iter().map(move |m| (s, m)))
            .collect();

        let mut results: Vec<BenchmarkResult> = units
            .par_iter()
            .map(|(s, spec)| {
                let outcome = if cancel.is_cancelled() {
                    Outcome::Cancelled
                } else {
                    evaluate(s, spec)
                };
                BenchmarkResult {
                    series_id: s.id.clone(),
                    model: spec.name().to_string(),
                    outcome,
                }
            })
            .collect();

        let combined: Vec<BenchmarkResult> = series
            .iter()
            .flat_map(|s| {
                let members = &results;
                self.ensembles.iter().map(move |e| BenchmarkResult {
                    series_id: s.id.clone(),
                    model: e.name().to_string(),
                    outcome: combine(e, s, members),
                })
            })
            .collect();
        results.extend(combined);

        let report = BenchmarkReport::new(results);
        info!(
            completed = report.n_completed(),
            failed = report.n_failed(),
            cancelled = report.n_cancelled(),
            "benchmark finished"
        );
        Ok(report)
    }

    fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(ForecastError::InvalidConfiguration(
                "benchmark needs at least one model".to_string(),
            ));
        }
        let mut names = HashSet::new();
        for name in self
            .models
            .iter()
            .map(ModelSpec::name)
            .chain(self.ensembles.iter().map(Ensemble::name))
        {
            if !names.insert(name) {
                return Err(ForecastError::InvalidConfiguration(format!(
                    "duplicate model name '{}'",
                    name
                )));
            }
        }
        for ensemble in &self.ensembles {
            if ensemble.members().is_empty() {
                return Err(ForecastError::InvalidConfiguration(format!(
                    "ensemble '{}' has no members",
                    ensemble.name()
                )));
            }
            if let Some(unknown) = ensemble
                .members()
                .iter()
                .find(|m| !self.models.iter().any(|spec| spec.name() == m.as_str()))
            {
                return Err(ForecastError::InvalidConfiguration(format!(
                    "ensemble '{}' refers to unknown model '{}'",
                    ensemble.name(),
                    unknown
                )));
            }
        }
        Ok(())
    }
}

fn evaluate(series: &BenchmarkSeries, spec: &ModelSpec) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(|| forecast_and_score(series, spec))) {
        Ok(Ok((forecast, metrics))) => Outcome::Completed { forecast, metrics },
        Ok(Err(e)) => {
            debug!(series = %series.id, model = spec.name(), error = %e, "benchmark unit failed");
            Outcome::Failed(e.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(series = %series.id, model = spec.name(), %message, "benchmark unit panicked");
            Outcome::Failed(format!("model panicked: {}", message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn forecast_and_score(
    series: &BenchmarkSeries,
    spec: &ModelSpec,
) -> Result<(Forecast, AccuracyMetrics)> {
    let mut model = spec.create();
    model.fit(&series.train)?;
    let forecast = model.predict(series.horizon())?;
    let metrics = score(series, &forecast)?;
    Ok((forecast, metrics))
}

fn score(series: &BenchmarkSeries, forecast: &Forecast) -> Result<AccuracyMetrics> {
    calculate_metrics(
        &series.test,
        forecast.point(),
        series.train.values(),
        series.train.frequency(),
    )
}

fn combine(ensemble: &Ensemble, series: &BenchmarkSeries, results: &[BenchmarkResult]) -> Outcome {
    let mut forecasts = Vec::with_capacity(ensemble.members().len());
    for member in ensemble.members() {
        let outcome = results
            .iter()
            .find(|r| r.series_id == series.id && &r.model == member)
            .map(|r| &r.outcome);
        match outcome {
            Some(Outcome::Completed { forecast, .. }) => forecasts.push(forecast),
            Some(Outcome::Failed(msg)) => {
                return Outcome::Failed(format!("member '{}' failed: {}", member, msg))
            }
            Some(Outcome::Cancelled) | None => return Outcome::Cancelled,
        }
    }

    match ensemble
        .combine(&forecasts)
        .and_then(|forecast| score(series, &forecast).map(|metrics| (forecast, metrics)))
    {
        Ok((forecast, metrics)) => Outcome::Completed { forecast, metrics },
        Err(e) => Outcome::Failed(e.to_string()),
    }
}
