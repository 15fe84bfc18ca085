//! Ichimoku baseline (Kijun-sen): midpoint of the `period` high/low range.
//!
//! Zero before index period-1.

use super::window_extremes;

pub fn ichimoku_baseline(highs: &[f64], lows: &[f64], period: usize) -> Vec<f64> {
    let n = highs.len().min(lows.len());
    let mut result = vec![0.0; highs.len()];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let start = i + 1 - period;
        if let Some((high, low)) = window_extremes(&highs[start..=i], &lows[start..=i]) {
            result[i] = (high + low) / 2.0;
        }
    }

    result
}
