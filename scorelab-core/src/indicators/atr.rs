//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), from bar 1.
//! Seed: mean of TR[1..=period] at index `period`.
//! Then Wilder smoothing: ATR = (ATR_prev * (period-1) + TR) / period.

/// True Range series. TR[0] is 0: it has no previous close.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut tr = vec![0.0; closes.len()];

    for i in 1..n {
        let h = highs[i];
        let l = lows[i];
        let pc = closes[i - 1];
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![0.0; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let tr = true_range(highs, lows, closes);
    let seed = tr[1..=period].iter().sum::<f64>() / period as f64;
    result[period] = seed;

    let p = period as f64;
    let mut prev = seed;
    for i in (period + 1)..n {
        let smoothed = (prev * (p - 1.0) + tr[i]) / p;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}
