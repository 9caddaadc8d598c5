//! Fourier pair regressors.
//!
//! For harmonic `k` the pair is `sin(2*pi*k*t/F)` and `cos(2*pi*k*t/F)`.
//! With an integer frequency the terms depend only on the cycle position.

use std::f64::consts::PI;

/// Fourier row for an observation at `position`: `[sin1, cos1, sin2, cos2, ...]`.
///
/// When `2 * harmonics == frequency` the last sine is identically zero;
/// it is kept so every row has the same width.
pub fn fourier_row(position: usize, frequency: usize, harmonics: usize) -> Vec<f64> {
    let t = (position % frequency) as f64;
    let mut row = Vec::with_capacity(2 * harmonics);
    for k in 1..=harmonics {
        let angle = 2.0 * PI * k as f64 * t / frequency as f64;
        row.push(angle.sin());
        row.push(angle.cos());
    }
    row
}

/// Column names `sin1, cos1, ..., sinK, cosK`.
pub fn fourier_names(harmonics: usize) -> Vec<String> {
    (1..=harmonics)
        .flat_map(|k| [format!("sin{}", k), format!("cos{}", k)])
        .collect()
}
