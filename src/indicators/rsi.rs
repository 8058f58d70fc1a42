// =============================================================================
// Relative Strength Index (RSI): simple-average variant
// =============================================================================
//
// Step 1: delta_i = close_i - close_{i-1}. Row 0 has no delta.
// Step 2: gain_i = max(delta_i, 0), loss_i = max(-delta_i, 0).
// Step 3: avg_gain / avg_loss are shrinking-window means of the last
//         `period` deltas (minimum one), using the same trailing mean as SMA.
//         Row 0 has no delta in its window, so both averages are 0 there.
// Step 4: RS  = avg_gain / (avg_loss + EPSILON)
//         RSI = 100 - 100 / (1 + RS)
//
// EPSILON only keeps the division defined when there were no losses; it biases
// RS very slightly and pushes an all-gain window to just under 100.
// =============================================================================

use super::sma::trailing_mean;

/// Added to the average loss before dividing.
pub const EPSILON: f64 = 1e-9;

/// Compute one RSI value per close.
///
/// Row 0 evaluates to 0 (no prior delta, RS = 0). Every value lies in
/// [0, 100]; it is strictly positive once the window holds a gain.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if closes.is_empty() {
        return Vec::new();
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip();

    // avg_*[j] covers deltas ending at close j + 1.
    let avg_gain = trailing_mean(&gains, period);
    let avg_loss = trailing_mean(&losses, period);

    let mut result = Vec::with_capacity(closes.len());
    result.push(rsi_from_averages(0.0, 0.0));
    result.extend(
        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| rsi_from_averages(g, l)),
    );

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = avg_gain / (avg_loss + EPSILON);
    100.0 - 100.0 / (1.0 + rs)
}
