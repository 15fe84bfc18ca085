//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = k * x[t] + (1 - k) * EMA[t-1], k = 2 / (period + 1)
//! Seed: EMA[period-1] = SMA of the first `period` values.
//! Warm-up entries (before period-1) are 0.

/// EMA of an arbitrary series. Inputs shorter than `period`, or a zero
/// period, yield an all-zero series.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![0.0; n];

    if period == 0 || n < period {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);

    // Seed: SMA of first `period` values
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let v = values[i] * k + prev * (1.0 - k);
        result[i] = v;
        prev = v;
    }

    result
}

/// Index of the first defined EMA value.
pub fn ema_warmup(period: usize) -> usize {
    period.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_input() {
        let result = ema(&[100.0, 200.0, 300.0], 1);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // k = 2/(3+1) = 0.5
        // Seed at index 2: SMA(10,11,12) = 11.0
        // EMA[3] = 0.5*13 + 0.5*11.0 = 12.0
        // EMA[4] = 0.5*14 + 0.5*12.0 = 13.0
        let result = ema(&[10.0, 11.0, 12.0, 13.0, 14.0], 3);

        assert_eq!(result[0], 0.0);
        assert_eq!(result[1], 0.0);
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_short_input_is_all_zero() {
        let result = ema(&[1.0, 2.0], 5);
        assert_eq!(result, vec![0.0, 0.0]);
        assert!(ema(&[1.0, 2.0], 0).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn ema_length_matches_input() {
        let input: Vec<f64> = (0..40).map(|i| i as f64).collect();
        assert_eq!(ema(&input, 12).len(), 40);
    }

    #[test]
    fn ema_warmup_index() {
        assert_eq!(ema_warmup(20), 19);
        assert_eq!(ema_warmup(1), 0);
    }
}
