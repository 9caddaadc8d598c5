//! End-to-end scenarios for the boosted autoregression pipeline.

use approx::assert_relative_eq;
use lagboost::core::{RegressorSet, Series};
use lagboost::error::{ForecastError, Result};
use lagboost::features::{build, DesignMatrix};
use lagboost::models::{
    FittedModel, Forecaster, ModelAdapter, RoundsSelection, TrendMethod, XgbAr, XgbArConfig,
};
use lagboost::seasonality::{SeasonalMethod, SeasonalState};
use lagboost::transform::Lambda;

fn monthly_sine(n: usize) -> Series {
    let values = (0..n)
        .map(|i| 100.0 + 10.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
        .collect();
    Series::new(values, 12).unwrap()
}

fn quick() -> XgbArConfig {
    XgbArConfig::new().with_rounds(RoundsSelection::Manual { rounds: 25 })
}

/// Learner that always predicts its first feature.
struct FirstFeature;

struct FirstFeatureModel;

impl FittedModel for FirstFeatureModel {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        Ok(features[0])
    }
}

impl ModelAdapter for FirstFeature {
    type Fitted = FirstFeatureModel;

    fn fit(
        &self,
        _matrix: &DesignMatrix,
        _target: &[f64],
        _rounds: &RoundsSelection,
    ) -> Result<FirstFeatureModel> {
        Ok(FirstFeatureModel)
    }
}

#[test]
fn monthly_sine_with_dummies_has_expected_design_shape() {
    let mut model = XgbAr::new(
        quick()
            .with_maxlag(12)
            .with_seasonal(SeasonalMethod::Dummies)
            .with_trend(TrendMethod::None)
            .with_lambda(Lambda::Fixed(1.0)),
    );
    model.fit(&monthly_sine(48)).unwrap();

    assert_eq!(model.training_shape(), Some((36, 23)));
    let names = model.feature_names().unwrap();
    assert_eq!(&names[..2], &["y_lag1", "y_lag2"]);
    assert_eq!(names[11], "y_lag12");
    assert_eq!(names[22], "season11");
}

#[test]
fn lag_matrix_of_counting_series() {
    let series: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let (x, y) = build(&series, "y", None, 2).unwrap();

    assert_eq!(x.n_rows(), 8);
    assert_eq!(y[0], 3.0);
    assert_eq!(x.row(0), &[2.0, 1.0]);
}

#[test]
fn first_feature_learner_forecasts_flat_line() {
    let series = Series::new(vec![1.0, 2.0, 3.0, 4.0, 5.0], 1).unwrap();
    let mut model = XgbAr::with_adapter(
        XgbArConfig::new()
            .with_maxlag(1)
            .with_seasonal(SeasonalMethod::None)
            .with_trend(TrendMethod::None)
            .with_lambda(Lambda::Fixed(1.0)),
        FirstFeature,
    );
    model.fit(&series).unwrap();

    let forecast = model.predict(3).unwrap();
    assert_eq!(forecast.point(), &[5.0, 5.0, 5.0]);
}

#[test]
fn maxlag_not_below_length_is_invalid() {
    let series = Series::new(vec![1.0, 2.0, 3.0, 4.0, 5.0], 1).unwrap();
    let mut model = XgbAr::new(quick().with_maxlag(5));
    assert!(matches!(
        model.fit(&series),
        Err(ForecastError::InvalidConfiguration(_))
    ));
}

#[test]
fn short_future_regressors_are_missing() {
    let series = Series::new((0..30).map(|i| (i % 5) as f64 + 1.0).collect(), 1).unwrap();
    let regs = RegressorSet::new()
        .with_column("promo", (0..30).map(|i| (i % 2) as f64).collect())
        .unwrap();
    let mut model = XgbAr::new(quick().with_maxlag(3));
    model.fit_with_regressors(&series, Some(&regs)).unwrap();

    let future = RegressorSet::new()
        .with_column("promo", vec![0.0, 1.0, 0.0])
        .unwrap();
    assert_eq!(
        model.forecast_with_regressors(5, Some(&future)).unwrap_err(),
        ForecastError::MissingRegressor { needed: 5, got: 3 }
    );
}

#[test]
fn decompose_of_constant_series_is_neutral() {
    let series = Series::new(vec![7.0; 36], 12).unwrap();
    let (state, adjusted) = SeasonalState::fit(SeasonalMethod::Decompose, &series, 1).unwrap();

    for index in state.indices().unwrap() {
        assert_relative_eq!(*index, 1.0, epsilon = 1e-12);
    }
    assert_eq!(adjusted.values(), series.values());
}

#[test]
fn fourier_seasonality_forecasts_periodic_signal() {
    let series = monthly_sine(72);
    let mut model = XgbAr::new(quick().with_maxlag(12).with_fourier(2));
    model.fit(&series).unwrap();

    assert_eq!(model.training_shape(), Some((60, 16)));
    let forecast = model.predict(12).unwrap();
    let truth = monthly_sine(84);
    for (f, y) in forecast.point().iter().zip(&truth.values()[72..]) {
        assert!((f - y).abs() < 5.0, "forecast {} vs {}", f, y);
    }
}

#[test]
fn trending_series_with_differencing_keeps_growing() {
    let values: Vec<f64> = (0..80)
        .map(|i| 20.0 + 2.0 * i as f64 + 3.0 * (i as f64 * 0.9).sin())
        .collect();
    let series = Series::new(values.clone(), 1).unwrap();
    let mut model = XgbAr::new(quick().with_maxlag(6).with_diff_order(1));
    model.fit(&series).unwrap();

    let forecast = model.predict(10).unwrap();
    let last = values[79];
    assert!(forecast.point()[9] > last, "{:?}", forecast.point());
    assert_eq!(model.diff_order(), Some(1));
}

#[test]
fn auto_lambda_roundtrips_fitted_values() {
    let values: Vec<f64> = (0..60)
        .map(|i| (5.0 + 0.3 * i as f64).powi(2) * (1.0 + 0.05 * (i as f64).cos()))
        .collect();
    let series = Series::new(values, 1).unwrap();
    let mut model = XgbAr::with_adapter(
        XgbArConfig::new()
            .with_maxlag(1)
            .with_seasonal(SeasonalMethod::None)
            .with_lambda(Lambda::Auto),
        FirstFeature,
    );
    model.fit(&series).unwrap();

    let lambda = model.lambda().unwrap();
    assert!((-1.0..=2.0).contains(&lambda));
    // Persistence survives the transform round trip
    let fitted = model.fitted_values().unwrap();
    for i in 1..series.len() {
        assert_relative_eq!(fitted[i], series.values()[i - 1], max_relative = 1e-8);
    }
}

#[test]
fn forecast_carries_calendar_timestamps() {
    use chrono::{Duration, TimeZone, Utc};

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let series = Series::builder()
        .values((0..40).map(|i| (i % 7) as f64 + 10.0).collect())
        .frequency(7)
        .calendar(start, Duration::days(1))
        .build()
        .unwrap();
    let mut model = XgbAr::new(quick().with_maxlag(7));
    model.fit(&series).unwrap();

    let forecast = model.predict(3).unwrap();
    let stamps = forecast.timestamps().unwrap();
    assert_eq!(stamps[0], start + Duration::days(40));
    assert_eq!(stamps[2], start + Duration::days(42));
    assert_eq!(forecast.residuals().len(), 40);
}
