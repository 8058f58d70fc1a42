// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands are an upper band (mean + k*σ) and a lower band
// (mean - k*σ) around the rolling mean of the closes.
//
// Unlike SMA/RSI these bands need a FULL window: rows before index
// `period - 1` carry no value. σ is the sample standard deviation (N - 1
// denominator).

/// Band columns aligned with the input closes. `None` marks rows without a
/// full window.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Rolling mean and sample standard deviation over exactly `period` values.
///
/// Returns `None` for rows `i < period - 1`, and for every row when
/// `period < 2` (a sample deviation needs two observations).
pub fn rolling_mean_std(values: &[f64], period: usize) -> Vec<Option<(f64, f64)>> {
    let mut result = vec![None; values.len()];
    if period < 2 || values.len() < period {
        return result;
    }

    for (end, slot) in result.iter_mut().enumerate().skip(period - 1) {
        let window = &values[end + 1 - period..=end];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance =
            window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        *slot = Some((mean, variance.sqrt()));
    }

    result
}

/// Calculate Bollinger Bands over `closes` with `num_std` standard deviations.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerBands {
    let stats = rolling_mean_std(closes, period);

    BollingerBands {
        upper: stats.iter().map(|s| s.map(|(m, sd)| m + num_std * sd)).collect(),
        lower: stats.iter().map(|s| s.map(|(m, sd)| m - num_std * sd)).collect(),
    }
}
