//! Stochastic RSI — RSI normalized against its own trailing range.
//!
//! StochRSI[i] = (RSI[i] - min) / (max - min) over the trailing `period`
//! RSI values; 0 when the range is flat.
//! Only seeded RSI values enter a window, so the first value is at
//! index 2 * period - 1. Output lies in [0, 1].

use super::rsi::rsi;

pub fn stoch_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![0.0; n];
    if period == 0 {
        return result;
    }

    let rsi_values = rsi(closes, period);
    let first = stoch_rsi_warmup(period);

    for i in first..n {
        let window = &rsi_values[i + 1 - period..=i];
        let lowest = window.iter().copied().fold(f64::INFINITY, f64::min);
        let highest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = highest - lowest;
        result[i] = if range == 0.0 {
            0.0
        } else {
            (rsi_values[i] - lowest) / range
        };
    }

    result
}

/// Index of the first defined StochRSI value.
pub fn stoch_rsi_warmup(period: usize) -> usize {
    (2 * period).saturating_sub(1)
}
