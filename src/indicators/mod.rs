// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicator stages. Every
// function takes plain slices and returns a column with exactly one entry per
// input row; rows without a value are `None`, never a numeric sentinel.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
