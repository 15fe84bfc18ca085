//! Volume-Weighted Average Price (VWAP), cumulative from the first bar.
//!
//! VWAP[i] = sum(TP * volume) / sum(volume), TP = (high + low + close) / 3.
//! Missing volume counts as 1, which reduces VWAP to the running mean of TP.

use crate::domain::Candle;

pub fn vwap(candles: &[Candle]) -> Vec<f64> {
    let mut result = Vec::with_capacity(candles.len());
    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;

    for candle in candles {
        let volume = candle.volume_or_unit();
        cum_pv += candle.typical_price() * volume;
        cum_volume += volume;
        result.push(if cum_volume == 0.0 { 0.0 } else { cum_pv / cum_volume });
    }

    result
}
