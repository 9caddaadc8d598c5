//! Aggregated benchmark results.

use crate::benchmark::runner::{BenchmarkResult, Outcome};
use crate::utils::{mean, median};

/// Accuracy of one model averaged over the series it completed.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub model: String,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Mean MASE over completed units with a defined MASE.
    pub mean_mase: Option<f64>,
    pub median_mase: Option<f64>,
    pub mean_smape: Option<f64>,
    pub mean_rmse: Option<f64>,
}

/// All unit results of a benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    pub(crate) fn new(results: Vec<BenchmarkResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Result of `model` on series `series_id`.
    pub fn get(&self, series_id: &str, model: &str) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .find(|r| r.series_id == series_id && r.model == model)
    }

    pub fn n_completed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Completed { .. }))
    }

    pub fn n_failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn n_cancelled(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Cancelled))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Per-model accuracy, best mean MASE first. Models without any MASE
    /// sort last, in order of first appearance.
    pub fn summary(&self) -> Vec<ModelSummary> {
        let mut models: Vec<&str> = Vec::new();
        for r in &self.results {
            if !models.contains(&r.model.as_str()) {
                models.push(&r.model);
            }
        }

        let mut summaries: Vec<ModelSummary> = models
            .into_iter()
            .map(|model| self.summarize(model))
            .collect();
        summaries.sort_by(|a, b| match (a.mean_mase, b.mean_mase) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        summaries
    }

    fn summarize(&self, model: &str) -> ModelSummary {
        let rows: Vec<&BenchmarkResult> =
            self.results.iter().filter(|r| r.model == model).collect();
        let metrics: Vec<_> = rows.iter().filter_map(|r| r.outcome.metrics()).collect();

        let mase: Vec<f64> = metrics.iter().filter_map(|m| m.mase).collect();
        let smape: Vec<f64> = metrics.iter().map(|m| m.smape).collect();
        let rmse: Vec<f64> = metrics.iter().map(|m| m.rmse).collect();
        let defined = |v: &[f64], f: fn(&[f64]) -> f64| (!v.is_empty()).then(|| f(v));

        ModelSummary {
            model: model.to_string(),
            completed: metrics.len(),
            failed: rows
                .iter()
                .filter(|r| matches!(r.outcome, Outcome::Failed(_)))
                .count(),
            cancelled: rows
                .iter()
                .filter(|r| matches!(r.outcome, Outcome::Cancelled))
                .count(),
            mean_mase: defined(&mase, mean),
            median_mase: defined(&mase, median),
            mean_smape: defined(&smape, mean),
            mean_rmse: defined(&rmse, mean),
        }
    }
}
