//! AR/BR sentiment ratios, per bar.
//!
//! AR = (high - open) / (open - low) * 100
//! BR = |high - prev_close| / |prev_close - low| * 100
//! Each is 0 when its denominator is 0; BR is 0 on the first bar.

use crate::domain::Candle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArBr {
    pub ar: Vec<f64>,
    pub br: Vec<f64>,
}

pub fn ar_br(candles: &[Candle]) -> ArBr {
    let n = candles.len();
    let mut out = ArBr {
        ar: vec![0.0; n],
        br: vec![0.0; n],
    };

    for (i, c) in candles.iter().enumerate() {
        let ar_den = c.open - c.low;
        if ar_den != 0.0 {
            out.ar[i] = (c.high - c.open) / ar_den * 100.0;
        }

        if i > 0 {
            let prev_close = candles[i - 1].close;
            let br_den = (prev_close - c.low).abs();
            if br_den != 0.0 {
                out.br[i] = (c.high - prev_close).abs() / br_den * 100.0;
            }
        }
    }

    out
}
