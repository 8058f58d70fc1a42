// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
// OBV is a running total of volume signed by the direction of the close:
//
//   signed_0 = 0
//   signed_i = sign(close_i - close_{i-1}) * volume_i     (i >= 1)
//   OBV_i    = signed_0 + ... + signed_i
//
// Writing it as a prefix sum over the signed-volume sequence makes the loop
// carried state explicit. Each step adds exactly the term the classic
// if/else-if fold would add, so the two formulations agree bit for bit.
// =============================================================================

/// Per-row signed volume. Row 0 is always 0.
///
/// `closes` and `volumes` must have the same length; extra elements in the
/// longer slice are ignored.
pub fn signed_volume(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let len = closes.len().min(volumes.len());
    if len == 0 {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(len);
    result.push(0.0);
    for i in 1..len {
        let signed = if closes[i] > closes[i - 1] {
            volumes[i]
        } else if closes[i] < closes[i - 1] {
            -volumes[i]
        } else {
            0.0
        };
        result.push(signed);
    }
    result
}

/// Inclusive left-to-right running sum.
pub fn prefix_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

pub fn calculate_obv(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    prefix_sum(&signed_volume(closes, volumes))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Straight transcription of the branchy running total.
    fn obv_fold(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
        let mut obv = vec![0.0];
        for i in 1..closes.len() {
            let last = *obv.last().unwrap();
            if closes[i] > closes[i - 1] {
                obv.push(last + volumes[i]);
            } else if closes[i] < closes[i - 1] {
                obv.push(last - volumes[i]);
            } else {
                obv.push(last);
            }
        }
        obv
    }

    #[test]
    fn obv_rising_prices() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0];
        let volumes = [100.0, 110.0, 120.0, 130.0, 140.0];
        assert_eq!(calculate_obv(&closes, &volumes), vec![0.0, 110.0, 230.0, 360.0, 500.0]);
    }

    #[test]
    fn obv_mixed_direction_matches_fold() {
        let closes = [5.0, 5.5, 5.5, 5.2, 6.0, 5.9, 5.9, 7.1, 3.0, 3.0, 3.1];
        let volumes = [900.0, 120.0, 75.0, 310.0, 44.0, 1000.0, 3.0, 18.0, 640.0, 12.0, 7.0];
        assert_eq!(calculate_obv(&closes, &volumes), obv_fold(&closes, &volumes));
    }

    #[test]
    fn obv_fractional_volumes_match_fold_exactly() {
        let closes: Vec<f64> = (0..200).map(|i| ((i * 37) % 11) as f64).collect();
        let volumes: Vec<f64> = (0..200).map(|i| 0.1 + i as f64 * 1.37).collect();
        assert_eq!(calculate_obv(&closes, &volumes), obv_fold(&closes, &volumes));
    }

    #[test]
    fn obv_first_row_ignores_volume() {
        assert_eq!(calculate_obv(&[1.0], &[500.0]), vec![0.0]);
    }

    #[test]
    fn obv_empty_input() {
        assert!(calculate_obv(&[], &[]).is_empty());
    }

    #[test]
    fn signed_volume_flat_is_zero() {
        assert_eq!(signed_volume(&[2.0, 2.0, 1.0], &[5.0, 6.0, 7.0]), vec![0.0, 0.0, -7.0]);
    }
}
