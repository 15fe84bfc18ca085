//! Indicator library.
//!
//! Every indicator is a pure function from aligned input series to output
//! series of the same length. Warm-up entries are zero (KDJ carries its
//! neutral 50 seed instead), never NaN, so downstream index access is always
//! defined. `precompute::IndicatorSet` runs them all once before scoring.

pub mod arbr;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod cr;
pub mod ema;
pub mod ichimoku;
pub mod kdj;
pub mod keltner;
pub mod macd;
pub mod parabolic_sar;
pub mod precompute;
pub mod rsi;
pub mod stoch_rsi;
pub mod td_sequential;
pub mod vwap;

pub use arbr::{ar_br, ArBr};
pub use atr::{atr, true_range};
pub use bollinger::{bollinger, BollingerBands};
pub use cci::cci;
pub use cr::cr;
pub use ema::ema;
pub use ichimoku::ichimoku_baseline;
pub use kdj::{kdj, KdjValue};
pub use keltner::{keltner, KeltnerChannel};
pub use macd::{macd, MacdSeries};
pub use parabolic_sar::parabolic_sar;
pub use precompute::{Indicator, IndicatorParams, IndicatorSet};
pub use rsi::rsi;
pub use stoch_rsi::stoch_rsi;
pub use td_sequential::td_sequential;
pub use vwap::vwap;

/// Highest and lowest value of a window. `None` for an empty window.
pub(crate) fn window_extremes(highs: &[f64], lows: &[f64]) -> Option<(f64, f64)> {
    if highs.is_empty() || lows.is_empty() {
        return None;
    }
    let high = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = lows.iter().copied().fold(f64::INFINITY, f64::min);
    Some((high, low))
}

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLC: open = prev_close (or close for the first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    use crate::domain::Candle;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Candle::new(format!("day-{i}"), open, high, low, close)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
