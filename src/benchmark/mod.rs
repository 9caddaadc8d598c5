//! Benchmarking models against held-out data.
//!
//! Every model is fitted on every training series in parallel and scored on
//! the held-out tail with the accuracy metrics in [`crate::utils`]. Ensembles
//! average the forecasts of other benchmarked models.

mod ensemble;
mod report;
mod runner;

pub use ensemble::Ensemble;
pub use report::{BenchmarkReport, ModelSummary};
pub use runner::{Benchmark, BenchmarkResult, BenchmarkSeries, CancellationToken, Outcome};
