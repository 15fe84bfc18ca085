//! Candle — the fundamental market data unit.

use serde::{Deserialize, Serialize};

/// OHLC bar for one instrument on one date.
///
/// The date is kept as the label found in the source data; bar order, not
/// the label, defines chronology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Traded volume, when the source provides one.
    #[serde(default)]
    pub volume: Option<f64>,
}

impl Candle {
    pub fn new(date: impl Into<String>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date: date.into(),
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Candle carrying only a close; open, high and low collapse onto it.
    pub fn from_close(date: impl Into<String>, close: f64) -> Self {
        Self::new(date, close, close, close, close)
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Volume used by volume-weighted indicators (1 when absent).
    pub fn volume_or_unit(&self) -> f64 {
        self.volume.unwrap_or(1.0)
    }

    /// Basic OHLC sanity check: high >= low, and open/close inside the range.
    pub fn is_sane(&self) -> bool {
        if self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Column views over a candle slice, in the shape the indicator library takes.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
}

impl Columns {
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut cols = Self {
            opens: Vec::with_capacity(candles.len()),
            highs: Vec::with_capacity(candles.len()),
            lows: Vec::with_capacity(candles.len()),
            closes: Vec::with_capacity(candles.len()),
        };
        for c in candles {
            cols.opens.push(c.open);
            cols.highs.push(c.high);
            cols.lows.push(c.low);
            cols.closes.push(c.close);
        }
        cols
    }
}
