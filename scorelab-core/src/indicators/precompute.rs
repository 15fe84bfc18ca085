//! Indicator precomputation.
//!
//! Every indicator series is computed once before scoring begins and stored
//! in an `IndicatorSet`, index-aligned with the candles. Scoring rules then
//! read single values by bar index.

use super::{
    ar_br, atr, bollinger, cci, cr, ema, ichimoku_baseline, kdj, keltner, macd, parabolic_sar,
    rsi, stoch_rsi, td_sequential, vwap, ArBr, BollingerBands, KdjValue, KeltnerChannel,
    MacdSeries,
};
use crate::domain::{Candle, Columns};
use serde::{Deserialize, Serialize};

/// Periods and multipliers for every indicator in the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub stoch_rsi_period: usize,
    pub cci_period: usize,
    pub kdj_period: usize,
    pub sar_accel: f64,
    pub sar_max_accel: f64,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub ema_short: usize,
    pub ema_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub atr_period: usize,
    pub cr_period: usize,
    pub ichimoku_period: usize,
    pub keltner_period: usize,
    pub keltner_multiplier: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            stoch_rsi_period: 14,
            cci_period: 20,
            kdj_period: 9,
            sar_accel: 0.02,
            sar_max_accel: 0.2,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            ema_short: 12,
            ema_long: 26,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            atr_period: 14,
            cr_period: 26,
            ichimoku_period: 26,
            keltner_period: 20,
            keltner_multiplier: 2.0,
        }
    }
}

impl IndicatorParams {
    /// Every period paired with its field name, for validation and display.
    pub fn periods(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("rsi_period", self.rsi_period),
            ("stoch_rsi_period", self.stoch_rsi_period),
            ("cci_period", self.cci_period),
            ("kdj_period", self.kdj_period),
            ("bollinger_period", self.bollinger_period),
            ("ema_short", self.ema_short),
            ("ema_long", self.ema_long),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("atr_period", self.atr_period),
            ("cr_period", self.cr_period),
            ("ichimoku_period", self.ichimoku_period),
            ("keltner_period", self.keltner_period),
        ]
    }
}

/// Indicators held by an `IndicatorSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Rsi,
    StochRsi,
    Cci,
    Kdj,
    Sar,
    Bollinger,
    EmaShort,
    EmaLong,
    Macd,
    Atr,
    Vwap,
    ArBr,
    Cr,
    Ichimoku,
    Keltner,
    TdSequential,
}

impl Indicator {
    pub const ALL: [Indicator; 16] = [
        Indicator::Rsi,
        Indicator::StochRsi,
        Indicator::Cci,
        Indicator::Kdj,
        Indicator::Sar,
        Indicator::Bollinger,
        Indicator::EmaShort,
        Indicator::EmaLong,
        Indicator::Macd,
        Indicator::Atr,
        Indicator::Vwap,
        Indicator::ArBr,
        Indicator::Cr,
        Indicator::Ichimoku,
        Indicator::Keltner,
        Indicator::TdSequential,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Indicator::Rsi => "rsi",
            Indicator::StochRsi => "stoch_rsi",
            Indicator::Cci => "cci",
            Indicator::Kdj => "kdj",
            Indicator::Sar => "sar",
            Indicator::Bollinger => "bollinger",
            Indicator::EmaShort => "ema_short",
            Indicator::EmaLong => "ema_long",
            Indicator::Macd => "macd",
            Indicator::Atr => "atr",
            Indicator::Vwap => "vwap",
            Indicator::ArBr => "ar_br",
            Indicator::Cr => "cr",
            Indicator::Ichimoku => "ichimoku",
            Indicator::Keltner => "keltner",
            Indicator::TdSequential => "td_sequential",
        }
    }
}

/// All indicator series for one candle sequence.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub params: IndicatorParams,
    pub rsi: Vec<f64>,
    pub stoch_rsi: Vec<f64>,
    pub cci: Vec<f64>,
    pub kdj: Vec<KdjValue>,
    pub sar: Vec<f64>,
    pub bollinger: BollingerBands,
    pub ema_short: Vec<f64>,
    pub ema_long: Vec<f64>,
    pub macd: MacdSeries,
    pub atr: Vec<f64>,
    pub vwap: Vec<f64>,
    pub ar_br: ArBr,
    pub cr: Vec<f64>,
    pub ichimoku: Vec<f64>,
    pub keltner: KeltnerChannel,
    pub td: Vec<i32>,
    len: usize,
}

impl IndicatorSet {
    pub fn compute(candles: &[Candle], params: &IndicatorParams) -> Self {
        let cols = Columns::from_candles(candles);
        let (h, l, c) = (&cols.highs, &cols.lows, &cols.closes);

        let set = Self {
            params: params.clone(),
            rsi: rsi(c, params.rsi_period),
            stoch_rsi: stoch_rsi(c, params.stoch_rsi_period),
            cci: cci(h, l, c, params.cci_period),
            kdj: kdj(h, l, c, params.kdj_period),
            sar: parabolic_sar(h, l, params.sar_accel, params.sar_max_accel),
            bollinger: bollinger(c, params.bollinger_period, params.bollinger_multiplier),
            ema_short: ema(c, params.ema_short),
            ema_long: ema(c, params.ema_long),
            macd: macd(c, params.macd_fast, params.macd_slow, params.macd_signal),
            atr: atr(h, l, c, params.atr_period),
            vwap: vwap(candles),
            ar_br: ar_br(candles),
            cr: cr(h, l, params.cr_period),
            ichimoku: ichimoku_baseline(h, l, params.ichimoku_period),
            keltner: keltner(h, l, c, params.keltner_period, params.keltner_multiplier),
            td: td_sequential(c),
            len: candles.len(),
        };

        debug_assert!(
            [
                set.rsi.len(),
                set.stoch_rsi.len(),
                set.cci.len(),
                set.kdj.len(),
                set.sar.len(),
                set.bollinger.upper.len(),
                set.macd.signal.len(),
                set.atr.len(),
                set.vwap.len(),
                set.ar_br.ar.len(),
                set.cr.len(),
                set.ichimoku.len(),
                set.keltner.upper.len(),
                set.td.len(),
            ]
            .iter()
            .all(|&n| n == set.len),
            "indicator series must share the candle length"
        );

        set
    }

    /// Number of bars covered by every series.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First index at which the indicator's value is meaningful.
    pub fn warmup(&self, indicator: Indicator) -> usize {
        let p = &self.params;
        match indicator {
            Indicator::Rsi => p.rsi_period,
            Indicator::StochRsi => super::stoch_rsi::stoch_rsi_warmup(p.stoch_rsi_period),
            Indicator::Cci => p.cci_period.saturating_sub(1),
            Indicator::Kdj => p.kdj_period.saturating_sub(1),
            Indicator::Sar => 0,
            Indicator::Bollinger => p.bollinger_period.saturating_sub(1),
            Indicator::EmaShort => super::ema::ema_warmup(p.ema_short),
            Indicator::EmaLong => super::ema::ema_warmup(p.ema_long),
            Indicator::Macd => {
                super::macd::macd_warmup(p.macd_fast, p.macd_slow, p.macd_signal)
            }
            Indicator::Atr => p.atr_period,
            Indicator::Vwap => 0,
            Indicator::ArBr => 1,
            Indicator::Cr => p.cr_period,
            Indicator::Ichimoku => p.ichimoku_period.saturating_sub(1),
            Indicator::Keltner => super::keltner::keltner_warmup(p.keltner_period),
            Indicator::TdSequential => 4,
        }
    }

    /// Largest warm-up across every indicator.
    pub fn max_warmup(&self) -> usize {
        Indicator::ALL
            .iter()
            .map(|&ind| self.warmup(ind))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;

    fn sample_candles(n: usize) -> Vec<Candle> {
        let closes: Vec<f64> = (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        make_candles(&closes)
    }

    #[test]
    fn every_series_matches_candle_length() {
        let candles = sample_candles(60);
        let set = IndicatorSet::compute(&candles, &IndicatorParams::default());
        assert_eq!(set.len(), 60);
        assert_eq!(set.rsi.len(), 60);
        assert_eq!(set.kdj.len(), 60);
        assert_eq!(set.macd.histogram.len(), 60);
        assert_eq!(set.keltner.lower.len(), 60);
        assert_eq!(set.td.len(), 60);
    }

    #[test]
    fn short_input_stays_aligned() {
        let candles = sample_candles(5);
        let set = IndicatorSet::compute(&candles, &IndicatorParams::default());
        assert_eq!(set.len(), 5);
        assert!(set.rsi.iter().all(|&v| v == 0.0));
        assert!(set.kdj.iter().all(|&v| v == KdjValue::seed()));
    }

    #[test]
    fn default_warmups() {
        let set = IndicatorSet::compute(&sample_candles(10), &IndicatorParams::default());
        assert_eq!(set.warmup(Indicator::Rsi), 14);
        assert_eq!(set.warmup(Indicator::StochRsi), 27);
        assert_eq!(set.warmup(Indicator::Kdj), 8);
        assert_eq!(set.warmup(Indicator::Macd), 33);
        assert_eq!(set.warmup(Indicator::Keltner), 20);
        assert_eq!(set.max_warmup(), 33);
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: IndicatorParams = serde_json::from_str(r#"{"kdj_period": 5}"#).unwrap();
        assert_eq!(params.kdj_period, 5);
        assert_eq!(params.rsi_period, 14);
    }

    #[test]
    fn periods_cover_every_window() {
        let params = IndicatorParams::default();
        let periods = params.periods();
        assert_eq!(periods.len(), 14);
        assert!(periods.iter().all(|(_, p)| *p >= 1));
    }
}
