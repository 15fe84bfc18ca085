//! MACD — difference of a fast and a slow EMA, with an EMA signal line.
//!
//! Line = EMA(fast) - EMA(slow), defined from the slow seed (slow-1).
//! Signal = EMA(signal) of the defined part of the line.
//! Histogram = line - signal where the signal is defined.
//! Undefined entries are 0.

use super::ema::ema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let n = closes.len();
    let mut out = MacdSeries {
        line: vec![0.0; n],
        signal: vec![0.0; n],
        histogram: vec![0.0; n],
    };
    if fast == 0 || slow == 0 || signal == 0 {
        return out;
    }

    let line_start = fast.max(slow) - 1;
    if n <= line_start {
        return out;
    }

    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    for i in line_start..n {
        out.line[i] = fast_ema[i] - slow_ema[i];
    }

    // Signal is seeded on the first `signal` defined line values only.
    let signal_tail = ema(&out.line[line_start..], signal);
    let signal_start = line_start + signal - 1;
    for i in signal_start..n {
        out.signal[i] = signal_tail[i - line_start];
        out.histogram[i] = out.line[i] - out.signal[i];
    }

    out
}

/// Index of the first defined signal value.
pub fn macd_warmup(fast: usize, slow: usize, signal: usize) -> usize {
    (fast.max(slow) + signal).saturating_sub(2)
}
