//! Quickstart example demonstrating basic usage of lagboost.
//!
//! Run with: cargo run --example quickstart

use chrono::{Duration, TimeZone, Utc};
use lagboost::core::Series;
use lagboost::models::{Forecaster, RoundsSelection, TrendMethod, XgbAr, XgbArConfig};
use lagboost::transform::Lambda;
use lagboost::utils::calculate_metrics;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== lagboost Quickstart ===\n");

    // 1. Monthly series with trend and seasonality
    let values: Vec<f64> = (0..120)
        .map(|i| {
            100.0                                                          // base level
            + 0.8 * i as f64                                               // linear trend
            + 12.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin()  // yearly cycle
            + 1.5 * (i as f64 * 0.7).cos()                                 // noise
        })
        .collect();

    let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
    let full = Series::builder()
        .values(values)
        .frequency(12)
        .name("sales")
        .calendar(start, Duration::days(30))
        .build()
        .unwrap();
    let train = full.slice(0, 108).unwrap();
    let test = &full.values()[108..];
    println!("Training on {} observations, holding out {}", train.len(), test.len());

    // 2. Fit the boosted autoregression
    println!("\n--- Fitting XgbAr ---");
    let config = XgbArConfig::new()
        .with_fourier(3)
        .with_trend(TrendMethod::Differencing)
        .with_lambda(Lambda::Auto)
        .with_rounds(RoundsSelection::CrossValidation {
            folds: 5,
            max_rounds: 100,
        });
    let mut model = XgbAr::new(config);
    model.fit(&train).unwrap();

    println!("maxlag: {:?}", model.maxlag());
    println!("differencing order: {:?}", model.diff_order());
    println!("lambda: {:.3}", model.lambda().unwrap_or(1.0));
    if let Some((rows, cols)) = model.training_shape() {
        println!("design matrix: {} rows x {} columns", rows, cols);
    }

    // 3. Forecast the held-out year
    println!("\n--- Point Forecast (12 steps ahead) ---");
    let forecast = model.predict(12).unwrap();
    let stamps = forecast.timestamps().unwrap_or(&[]);
    for (i, pred) in forecast.point().iter().enumerate() {
        match stamps.get(i) {
            Some(t) => println!("  {}: {:.2} (actual {:.2})", t.date_naive(), pred, test[i]),
            None => println!("  h={}: {:.2} (actual {:.2})", i + 1, pred, test[i]),
        }
    }

    // 4. Most important features
    println!("\n--- Feature Importance ---");
    let mut importance = model.importance().unwrap_or_default();
    importance.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (name, score) in importance.iter().take(5) {
        println!("  {:<12} {:.3}", name, score);
    }

    // 5. Out-of-sample accuracy
    println!("\n--- Out-of-Sample Accuracy ---");
    let metrics = calculate_metrics(test, forecast.point(), train.values(), 12).unwrap();
    println!("MAE:   {:.3}", metrics.mae);
    println!("RMSE:  {:.3}", metrics.rmse);
    println!("sMAPE: {:.3}", metrics.smape);
    if let Some(mase) = metrics.mase {
        println!("MASE:  {:.3}", mase);
    }
}
