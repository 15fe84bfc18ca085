//! Keltner Channel — EMA +/- ATR multiplier.
//!
//! - Middle: EMA(close, period)
//! - Upper: middle + mult * ATR(period)
//! - Lower: middle - mult * ATR(period)
//!
//! All three bands are 0 until both EMA and ATR are defined
//! (index `period`, where ATR seeds).

use super::atr::atr;
use super::ema::ema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeltnerChannel {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn keltner(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    multiplier: f64,
) -> KeltnerChannel {
    let n = closes.len();
    let mut channel = KeltnerChannel {
        upper: vec![0.0; n],
        middle: vec![0.0; n],
        lower: vec![0.0; n],
    };
    if period == 0 {
        return channel;
    }

    let ema_values = ema(closes, period);
    let atr_values = atr(highs, lows, closes, period);

    for i in keltner_warmup(period)..n {
        channel.middle[i] = ema_values[i];
        channel.upper[i] = ema_values[i] + multiplier * atr_values[i];
        channel.lower[i] = ema_values[i] - multiplier * atr_values[i];
    }

    channel
}

/// Index of the first defined Keltner value. ATR seeds one bar after the EMA.
pub fn keltner_warmup(period: usize) -> usize {
    period
}
