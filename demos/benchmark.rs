//! Benchmark XgbAr against naive baselines on a set of synthetic series.
//!
//! Run with: RUST_LOG=info cargo run --example benchmark

use lagboost::benchmark::{Benchmark, BenchmarkSeries, CancellationToken, Ensemble};
use lagboost::core::Series;
use lagboost::models::baseline::{Naive, SeasonalNaive};
use lagboost::models::{ModelSpec, RoundsSelection, TrendMethod, XgbAr, XgbArConfig};
use lagboost::seasonality::SeasonalMethod;
use rand::prelude::*;
use rand::rngs::StdRng;

fn synthetic(rng: &mut StdRng, n: usize, period: usize) -> Vec<f64> {
    let level = rng.gen_range(50.0..150.0);
    let slope = rng.gen_range(-0.2..0.6);
    let amplitude = rng.gen_range(2.0..15.0);
    (0..n)
        .map(|i| {
            level
                + slope * i as f64
                + amplitude * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                + rng.gen_range(-1.0..1.0)
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut rng = StdRng::seed_from_u64(7);
    let data: Vec<BenchmarkSeries> = (0..24)
        .map(|k| {
            let series = Series::new(synthetic(&mut rng, 96, 12), 12).unwrap();
            BenchmarkSeries::split(format!("M{}", k + 1), &series, 18).unwrap()
        })
        .collect();

    let xgbar = |seasonal: SeasonalMethod| {
        move || -> lagboost::models::BoxedForecaster {
            Box::new(XgbAr::new(
                XgbArConfig::new()
                    .with_seasonal(seasonal)
                    .with_trend(TrendMethod::Differencing)
                    .with_rounds(RoundsSelection::Validation {
                        fraction: 0.2,
                        max_rounds: 80,
                    }),
            ))
        }
    };

    let benchmark = Benchmark::new()
        .with_model(ModelSpec::new("naive", || Box::new(Naive::new())))
        .with_model(ModelSpec::new("snaive", || Box::new(SeasonalNaive::new())))
        .with_model(ModelSpec::new("xgbar_dummies", xgbar(SeasonalMethod::Dummies)))
        .with_model(ModelSpec::new("xgbar_decompose", xgbar(SeasonalMethod::Decompose)))
        .with_ensemble(Ensemble::new(
            "xgbar_snaive",
            vec!["xgbar_dummies", "snaive"],
        ));

    let report = benchmark.run(&data, &CancellationToken::new()).unwrap();

    println!(
        "{:<18} {:>8} {:>8} {:>8} {:>6}",
        "model", "MASE", "sMAPE", "RMSE", "fails"
    );
    println!("{:-<52}", "");
    for row in report.summary() {
        println!(
            "{:<18} {:>8.3} {:>8.3} {:>8.3} {:>6}",
            row.model,
            row.mean_mase.unwrap_or(f64::NAN),
            row.mean_smape.unwrap_or(f64::NAN),
            row.mean_rmse.unwrap_or(f64::NAN),
            row.failed
        );
    }
}
