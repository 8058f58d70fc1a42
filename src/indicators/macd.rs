// =============================================================================
// MACD: dual EMA trend indicator
// =============================================================================
//
//   MACD_t   = EMA12_t - EMA26_t
//   signal_t = EMA9(MACD)_t
//
// Both price EMAs are seeded independently with the first close and the
// signal line is seeded with MACD_0 (which is always 0), so all rows carry a
// value.
// =============================================================================

use super::ema::calculate_ema;

pub const FAST_SPAN: usize = 12;
pub const SLOW_SPAN: usize = 26;
pub const SIGNAL_SPAN: usize = 9;

/// MACD line and its signal line, aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Standard 12/26/9 MACD.
pub fn calculate_macd(closes: &[f64]) -> MacdSeries {
    let fast_ema = calculate_ema(closes, FAST_SPAN);
    let slow_ema = calculate_ema(closes, SLOW_SPAN);

    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal = calculate_ema(&macd, SIGNAL_SPAN);

    MacdSeries { macd, signal }
}
