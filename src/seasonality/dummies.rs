//! Seasonal indicator columns.

/// Indicator row for an observation at `position` in a cycle of `frequency`.
///
/// There are `frequency - 1` columns, one for each of positions
/// `0..frequency - 1`; the last position is the reference and encodes as
/// all zeros.
pub fn dummy_row(position: usize, frequency: usize) -> Vec<f64> {
    let width = frequency.saturating_sub(1);
    (0..width)
        .map(|p| if p == position % frequency { 1.0 } else { 0.0 })
        .collect()
}

/// Column names `season1..season{frequency-1}`.
pub fn dummy_names(frequency: usize) -> Vec<String> {
    (1..frequency).map(|p| format!("season{}", p)).collect()
}
