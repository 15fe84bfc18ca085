//! Per-bar scoring.
//!
//! The engine reads the precomputed `IndicatorSet` at one index and sums
//! every rule's contribution. Rules run in a fixed order so the signal list
//! reads the same way on every bar:
//!
//! 1. KDJ evaluator
//! 2. StochRSI evaluator (rounded)
//! 3. RSI zone or layered RSI evaluator
//! 4. CCI, Bollinger, EMA position, MACD cross, SAR flip
//! 5. ATR direction (note only, no score)
//! 6. VWAP, AR/BR, CR, Ichimoku baseline, Keltner, TD Sequential
//!
//! A rule is skipped while its indicator is still warming up, and the KDJ
//! and StochRSI evaluators only ever see the series from its first real
//! value on. An evaluator that fails drops only its own contribution; the
//! failure is kept on the `BarScore` and reported to the `EventLog`.

use super::config::{RsiRule, ScoringConfig};
use super::{BarScore, SkippedEvaluator};
use crate::domain::Candle;
use crate::error::EvalError;
use crate::evaluate::{evaluate_kdj, evaluate_rsi, evaluate_stoch_rsi};
use crate::indicators::{Indicator, IndicatorSet};
use crate::log::EventLog;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const CCI_BAND: f64 = 100.0;
const ARBR_STRONG: f64 = 120.0;
const ARBR_WEAK: f64 = 80.0;
const CR_STRONG: f64 = 150.0;
const CR_WEAK: f64 = 100.0;
const TD_SETUP: i32 = 9;

/// Stateless scorer over one candle sequence and its indicators.
pub struct ScoringEngine<'a> {
    indicators: &'a IndicatorSet,
    candles: &'a [Candle],
    closes: Vec<f64>,
    config: &'a ScoringConfig,
    log: &'a dyn EventLog,
}

impl<'a> ScoringEngine<'a> {
    /// The indicator set must have been computed from `candles`.
    pub fn new(
        indicators: &'a IndicatorSet,
        candles: &'a [Candle],
        config: &'a ScoringConfig,
        log: &'a dyn EventLog,
    ) -> Self {
        assert_eq!(
            indicators.len(),
            candles.len(),
            "indicator set and candles must have the same length"
        );
        Self {
            indicators,
            candles,
            closes: candles.iter().map(|c| c.close).collect(),
            config,
            log,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Score every bar in order.
    pub fn score_all(&self) -> Vec<BarScore> {
        (0..self.len()).filter_map(|i| self.score(i).ok()).collect()
    }

    /// Score the bar at `index`.
    pub fn score(&self, index: usize) -> Result<BarScore, EvalError> {
        EvalError::check_index(index, self.len())?;

        let mut bar = BarScore::new(index);
        self.kdj_rule(index, &mut bar);
        self.stoch_rsi_rule(index, &mut bar);
        self.rsi_rule(index, &mut bar);
        self.cci_rule(index, &mut bar);
        self.bollinger_rule(index, &mut bar);
        self.ema_rule(index, &mut bar);
        self.macd_rule(index, &mut bar);
        self.sar_rule(index, &mut bar);
        self.atr_note(index, &mut bar);
        self.vwap_rule(index, &mut bar);
        self.ar_br_rule(index, &mut bar);
        self.cr_rule(index, &mut bar);
        self.ichimoku_rule(index, &mut bar);
        self.keltner_rule(index, &mut bar);
        self.td_rule(index, &mut bar);

        self.log.bar_scored(&bar);
        Ok(bar)
    }

    fn ready(&self, indicator: Indicator, index: usize) -> bool {
        index >= self.indicators.warmup(indicator)
    }

    /// Ready and with a ready prior bar, for rules comparing two bars.
    fn ready_with_prior(&self, indicator: Indicator, index: usize) -> bool {
        index > self.indicators.warmup(indicator)
    }

    fn skip(&self, bar: &mut BarScore, evaluator: &'static str, error: EvalError) {
        self.log.evaluator_skipped(evaluator, bar.index, &error);
        bar.skipped.push(SkippedEvaluator { evaluator, error });
    }

    fn kdj_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready_with_prior(Indicator::Kdj, i) {
            return;
        }
        // Persistence and divergence look back; keep the seed readings out of reach.
        let start = self.indicators.warmup(Indicator::Kdj);
        let seeded = &self.indicators.kdj[start..];
        match evaluate_kdj(seeded, &self.closes[start..], i - start, &self.config.kdj) {
            Ok(eval) => {
                bar.score += eval.score;
                bar.signals.extend(eval.signals);
            }
            Err(err) => self.skip(bar, "kdj", err),
        }
    }

    fn stoch_rsi_rule(&self, i: usize, bar: &mut BarScore) {
        let start = self.indicators.warmup(Indicator::StochRsi);
        if i < start {
            return;
        }
        // The evaluator looks back over prior values; hide the warm-up zeros.
        let seeded = &self.indicators.stoch_rsi[start..];
        match evaluate_stoch_rsi(seeded, i - start, &self.config.stoch_rsi) {
            Ok(res) => {
                bar.score += res.rounded_score();
                bar.signals.extend(res.signals);
            }
            Err(err) => self.skip(bar, "stoch_rsi", err),
        }
    }

    fn rsi_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::Rsi, i) {
            return;
        }
        let rsi = self.indicators.rsi[i];
        match self.config.rsi_rule {
            RsiRule::Zone => {
                if rsi < RSI_OVERSOLD {
                    bar.add(1, format!("RSI {rsi:.1} below {RSI_OVERSOLD:.0}"));
                } else if rsi > RSI_OVERBOUGHT {
                    bar.add(-1, format!("RSI {rsi:.1} above {RSI_OVERBOUGHT:.0}"));
                }
            }
            RsiRule::Layered => match evaluate_rsi(&self.indicators.rsi, i) {
                Ok(res) => {
                    bar.score += res.rounded_score();
                    bar.signals.extend(res.signals);
                }
                Err(err) => self.skip(bar, "rsi", err),
            },
        }
    }

    fn cci_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::Cci, i) {
            return;
        }
        let cci = self.indicators.cci[i];
        if cci > CCI_BAND {
            bar.add(1, "CCI above +100");
        } else if cci < -CCI_BAND {
            bar.add(-1, "CCI below -100");
        }
    }

    fn bollinger_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::Bollinger, i) {
            return;
        }
        let close = self.closes[i];
        let bands = &self.indicators.bollinger;
        if close < bands.lower[i] {
            bar.add(1, "Close below lower Bollinger band");
        } else if close > bands.upper[i] {
            bar.add(-1, "Close above upper Bollinger band");
        }
    }

    fn ema_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::EmaShort, i) || !self.ready(Indicator::EmaLong, i) {
            return;
        }
        let (short, long) = (self.indicators.ema_short[i], self.indicators.ema_long[i]);
        if short > long {
            bar.add(1, "Short EMA above long EMA");
        } else if short < long {
            bar.add(-1, "Short EMA below long EMA");
        }
    }

    fn macd_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready_with_prior(Indicator::Macd, i) {
            return;
        }
        let m = &self.indicators.macd;
        let (line, signal) = (m.line[i], m.signal[i]);
        let (prev_line, prev_signal) = (m.line[i - 1], m.signal[i - 1]);
        if prev_line <= prev_signal && line > signal {
            bar.add(1, "MACD crossed above signal");
        } else if prev_line >= prev_signal && line < signal {
            bar.add(-1, "MACD crossed below signal");
        }
    }

    fn sar_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready_with_prior(Indicator::Sar, i) {
            return;
        }
        let sar = &self.indicators.sar;
        let (prev_close, close) = (self.closes[i - 1], self.closes[i]);
        if prev_close <= sar[i - 1] && close > sar[i] {
            bar.add(1, "Close crossed above SAR");
        } else if prev_close >= sar[i - 1] && close < sar[i] {
            bar.add(-1, "Close crossed below SAR");
        }
    }

    fn atr_note(&self, i: usize, bar: &mut BarScore) {
        if !self.ready_with_prior(Indicator::Atr, i) {
            return;
        }
        let atr = &self.indicators.atr;
        if atr[i] > atr[i - 1] {
            bar.note("ATR rising");
        } else if atr[i] < atr[i - 1] {
            bar.note("ATR falling");
        }
    }

    fn vwap_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::Vwap, i) {
            return;
        }
        let (close, vwap) = (self.closes[i], self.indicators.vwap[i]);
        if close > vwap {
            bar.add(1, "Close above VWAP");
        } else if close < vwap {
            bar.add(-1, "Close below VWAP");
        }
    }

    fn ar_br_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::ArBr, i) {
            return;
        }
        let (ar, br) = (self.indicators.ar_br.ar[i], self.indicators.ar_br.br[i]);
        if ar > ARBR_STRONG && br > ARBR_STRONG {
            bar.add(1, "AR and BR above 120");
        } else if ar < ARBR_WEAK && br < ARBR_WEAK {
            bar.add(-1, "AR and BR below 80");
        }
    }

    fn cr_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::Cr, i) {
            return;
        }
        let cr = self.indicators.cr[i];
        // Zero marks an undefined ratio.
        if cr == 0.0 {
            return;
        }
        if cr > CR_STRONG {
            bar.add(1, "CR above 150");
        } else if cr < CR_WEAK {
            bar.add(-1, "CR below 100");
        }
    }

    fn ichimoku_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::Ichimoku, i) {
            return;
        }
        let (close, baseline) = (self.closes[i], self.indicators.ichimoku[i]);
        if close > baseline {
            bar.add(1, "Close above Ichimoku baseline");
        } else if close < baseline {
            bar.add(-1, "Close below Ichimoku baseline");
        }
    }

    fn keltner_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::Keltner, i) {
            return;
        }
        let close = self.closes[i];
        let channel = &self.indicators.keltner;
        if close > channel.upper[i] {
            bar.add(1, "Close above Keltner upper band");
        } else if close < channel.lower[i] {
            bar.add(-1, "Close below Keltner lower band");
        }
    }

    fn td_rule(&self, i: usize, bar: &mut BarScore) {
        if !self.ready(Indicator::TdSequential, i) {
            return;
        }
        match self.indicators.td[i] {
            v if v == -TD_SETUP => bar.add(1, "TD Sequential down 9 (bottom exhaustion)"),
            v if v == TD_SETUP => bar.add(-1, "TD Sequential up 9 (top exhaustion)"),
            _ => {}
        }
    }
}
