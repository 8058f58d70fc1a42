// =============================================================================
// Simple Moving Average (SMA): shrinking window
// =============================================================================
//
// For index i the value is the arithmetic mean of
//   values[max(0, i - period + 1) ..= i]
//
// The first `period - 1` rows average over however many samples exist so far
// (minimum one), so the output never contains a "no value" entry. Every
// window is summed independently: a window of zeros averages to exactly 0
// and a window of non-negative values never goes negative.
// =============================================================================

/// Shrinking-window trailing mean of `values`.
///
/// # Edge cases
/// - empty input => empty vec
/// - `period == 0` is treated as `period == 1` (the value itself)
pub fn trailing_mean(values: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);

    (0..values.len())
        .map(|end| {
            let window = &values[(end + 1).saturating_sub(period)..=end];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// `SMA_20`-style column: trailing mean of closes with a shrinking warm-up.
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<f64> {
    trailing_mean(closes, period)
}
