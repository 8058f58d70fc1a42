// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = value_0
//   EMA_t  = alpha * value_t + (1 - alpha) * EMA_{t-1}
//
// Seeding with the first value (rather than an SMA of the first `span`
// values) means every row has an EMA; there is no warm-up gap.
// =============================================================================

/// Decay factor for an exponential average with the given `span`.
pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Compute the EMA series for `values` with smoothing `span`.
///
/// The output has exactly one element per input element.
///
/// # Edge cases
/// - empty input => empty vec
/// - `span == 0` gives alpha = 2, which is meaningless; callers pass fixed
///   spans (9, 12, 20, 26) so this is not guarded further.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };

    let alpha = smoothing_factor(span);
    let mut result = Vec::with_capacity(values.len());
    result.push(seed);

    let mut prev = seed;
    for &value in &values[1..] {
        let ema = alpha * value + (1.0 - alpha) * prev;
        result.push(ema);
        prev = ema;
    }

    result
}
