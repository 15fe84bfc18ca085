//! Commodity Channel Index (CCI).
//!
//! TP = (high + low + close) / 3.
//! CCI = (TP - mean(TP)) / (0.015 * mean_abs_dev(TP)) over `period`.
//! 0 when the deviation is 0 and before index period - 1.

const LAMBERT: f64 = 0.015;

pub fn cci(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut result = vec![0.0; closes.len()];

    if period == 0 || n < period {
        return result;
    }

    let typical: Vec<f64> = (0..n)
        .map(|i| (highs[i] + lows[i] + closes[i]) / 3.0)
        .collect();

    for i in (period - 1)..n {
        let window = &typical[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let mean_dev = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;
        if mean_dev != 0.0 {
            result[i] = (typical[i] - mean) / (LAMBERT * mean_dev);
        }
    }

    result
}
