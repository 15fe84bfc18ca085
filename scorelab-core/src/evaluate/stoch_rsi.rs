//! StochRSI evaluator.
//!
//! Works on a StochRSI series normalized to [0, 1]. Three rules contribute
//! named components: a layered band score, a bottom-reversal bonus, and a
//! persistence bonus for staying in an extreme zone. Band thresholds are
//! either static or taken from percentiles of a trailing window.

use super::EvalResult;
use crate::error::EvalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Percentile windows at or below this length fall back to static thresholds.
const MIN_PERCENTILE_WINDOW: usize = 10;

/// Strategy for reading a percentile out of a window of values.
pub trait Percentile: Send + Sync + fmt::Debug {
    /// Value at fraction `p` (0..=1) of the window's distribution.
    fn percentile(&self, window: &[f64], p: f64) -> f64;
}

/// Linear interpolation between the two nearest order statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearPercentile;

impl Percentile for LinearPercentile {
    fn percentile(&self, window: &[f64], p: f64) -> f64 {
        percentile_linear(window, p)
    }
}

/// Linear-interpolated percentile.
///
/// Empty window → 0. `p <= 0` → minimum, `p >= 1` → maximum. Otherwise the
/// sorted window is read at position `(n - 1) * p`, interpolating between
/// the floor and ceiling entries.
pub fn percentile_linear(window: &[f64], p: f64) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    if p <= 0.0 {
        return window.iter().copied().fold(f64::INFINITY, f64::min);
    }
    if p >= 1.0 {
        return window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    }

    let mut sorted = window.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = (sorted.len() - 1) as f64 * p;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let frac = pos - lower as f64;
    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

fn default_percentile() -> Arc<dyn Percentile> {
    Arc::new(LinearPercentile)
}

/// Thresholds, weights and look-backs for the StochRSI rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StochRsiConfig {
    pub severe_oversold: f64,
    pub oversold: f64,
    pub overbought: f64,
    pub severe_overbought: f64,

    pub w_severe_oversold: f64,
    pub w_oversold: f64,
    pub w_overbought: f64,
    pub w_severe_overbought: f64,

    pub slope_lookback: usize,
    pub min_rise_bars: usize,
    /// Only widens the required history; no cross rule reads it.
    pub crossover_hysteresis: usize,

    pub persist_bars: usize,
    pub w_persist_oversold: f64,
    pub w_persist_overbought: f64,
    pub w_bottom_rise: f64,

    pub use_percentile: bool,
    pub percentile_window: usize,
    pub p_oversold: f64,
    pub p_overbought: f64,

    #[serde(skip, default = "default_percentile")]
    pub percentile: Arc<dyn Percentile>,
}

impl Default for StochRsiConfig {
    fn default() -> Self {
        Self {
            severe_oversold: 0.10,
            oversold: 0.20,
            overbought: 0.80,
            severe_overbought: 0.90,

            w_severe_oversold: 2.0,
            w_oversold: 1.0,
            w_overbought: -1.0,
            w_severe_overbought: -2.0,

            slope_lookback: 3,
            min_rise_bars: 2,
            crossover_hysteresis: 1,

            persist_bars: 3,
            w_persist_oversold: 0.5,
            w_persist_overbought: -0.5,
            w_bottom_rise: 1.0,

            use_percentile: false,
            percentile_window: 100,
            p_oversold: 0.20,
            p_overbought: 0.80,

            percentile: default_percentile(),
        }
    }
}

impl StochRsiConfig {
    /// History the rules need before `index` can be evaluated.
    pub fn required_history(&self) -> usize {
        self.slope_lookback
            .saturating_add(1)
            .max(self.min_rise_bars)
            .max(self.crossover_hysteresis)
    }

    fn percentile_enabled(&self) -> bool {
        self.use_percentile && self.percentile_window > MIN_PERCENTILE_WINDOW
    }
}

/// Band thresholds in effect for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bands {
    severe_oversold: f64,
    oversold: f64,
    overbought: f64,
    severe_overbought: f64,
}

impl Bands {
    fn at(series: &[f64], index: usize, cfg: &StochRsiConfig) -> Self {
        if !cfg.percentile_enabled() {
            return Self {
                severe_oversold: cfg.severe_oversold,
                oversold: cfg.oversold,
                overbought: cfg.overbought,
                severe_overbought: cfg.severe_overbought,
            };
        }

        let start = (index + 1).saturating_sub(cfg.percentile_window);
        let window = &series[start..=index];
        let oversold = cfg.percentile.percentile(window, cfg.p_oversold);
        let overbought = cfg.percentile.percentile(window, cfg.p_overbought);
        Self {
            severe_oversold: clamp01(oversold * 0.5),
            oversold,
            overbought,
            severe_overbought: clamp01((1.0 + overbought) / 2.0),
        }
    }
}

/// Evaluate the StochRSI rules at `index`.
pub fn evaluate_stoch_rsi(
    series: &[f64],
    index: usize,
    cfg: &StochRsiConfig,
) -> Result<EvalResult, EvalError> {
    EvalError::check_index(index, series.len())?;

    let need = cfg.required_history();
    if index < need {
        tracing::trace!(index, need, "stoch rsi: not enough history");
        return Err(EvalError::NotEnoughData {
            needed: need.saturating_add(1),
            available: index + 1,
        });
    }

    let s = series[index];
    let bands = Bands::at(series, index, cfg);
    let mut res = EvalResult::default();

    // Layer
    let mut layer = 0.0;
    if s < bands.severe_oversold {
        layer += cfg.w_severe_oversold;
        res.signal("StochRSI severe oversold");
    } else if s < bands.oversold {
        layer += cfg.w_oversold;
        res.signal("StochRSI oversold");
    } else if s > bands.overbought && s <= bands.severe_overbought {
        layer += cfg.w_overbought;
        res.signal("StochRSI overbought");
    } else if s > bands.severe_overbought {
        layer += cfg.w_severe_overbought;
        res.signal("StochRSI severe overbought");
    }
    res.accumulate("layer", layer);

    // Bottom rise
    if s < bands.oversold
        && is_rising(series, index, cfg.min_rise_bars)
        && slope(series, index, cfg.slope_lookback) > 0.0
    {
        res.accumulate("bottom_rise", cfg.w_bottom_rise);
        res.signal("StochRSI bottom rising");
    }

    // Persistence
    if cfg.persist_bars > 0 {
        if stayed(series, index, cfg.persist_bars, |v| v < bands.oversold) {
            res.accumulate("persist_os", cfg.w_persist_oversold);
            res.signal("StochRSI oversold persisting");
        }
        if stayed(series, index, cfg.persist_bars, |v| v > bands.overbought) {
            res.accumulate("persist_ob", cfg.w_persist_overbought);
            res.signal("StochRSI overbought persisting");
        }
    }

    Ok(res.finish())
}

/// Every step over the last `bars` bars ending at `index` rises strictly.
fn is_rising(series: &[f64], index: usize, bars: usize) -> bool {
    if bars == 0 || index < bars {
        return false;
    }
    series[index - bars..=index].windows(2).all(|w| w[1] > w[0])
}

fn slope(series: &[f64], index: usize, lookback: usize) -> f64 {
    if lookback == 0 || index < lookback {
        return 0.0;
    }
    series[index] - series[index - lookback]
}

/// Every value of the `bars`-long window ending at `index` satisfies `inside`.
fn stayed(series: &[f64], index: usize, bars: usize, inside: impl Fn(f64) -> bool) -> bool {
    if index + 1 < bars {
        return false;
    }
    series[index + 1 - bars..=index].iter().all(|&v| inside(v))
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> StochRsiConfig {
        StochRsiConfig::default()
    }

    // ── Percentile ──

    #[test]
    fn percentile_linear_known_points() {
        let w = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_linear(&w, 0.5), 3.0);
        assert_eq!(percentile_linear(&w, 0.0), 1.0);
        assert_eq!(percentile_linear(&w, 1.0), 5.0);
        assert!((percentile_linear(&w, 0.2) - 1.8).abs() < 1e-12);
    }

    #[test]
    fn percentile_linear_unsorted_and_empty() {
        assert_eq!(percentile_linear(&[5.0, 1.0, 3.0], 0.5), 3.0);
        assert_eq!(percentile_linear(&[], 0.5), 0.0);
        assert_eq!(percentile_linear(&[7.0], 0.3), 7.0);
    }

    // ── Errors ──

    #[test]
    fn empty_and_out_of_range() {
        assert!(matches!(
            evaluate_stoch_rsi(&[], 0, &cfg()),
            Err(EvalError::NotEnoughData { .. })
        ));
        assert_eq!(
            evaluate_stoch_rsi(&[0.5; 5], 5, &cfg()),
            Err(EvalError::IndexOutOfRange { index: 5, len: 5 })
        );
    }

    #[test]
    fn needs_history() {
        // Default need = max(1 + 3, 2, 1) = 4.
        let series = [0.5; 10];
        assert!(matches!(
            evaluate_stoch_rsi(&series, 3, &cfg()),
            Err(EvalError::NotEnoughData { .. })
        ));
        assert!(evaluate_stoch_rsi(&series, 4, &cfg()).is_ok());
    }

    #[test]
    fn hysteresis_widens_required_history() {
        let mut c = cfg();
        c.crossover_hysteresis = 6;
        assert_eq!(c.required_history(), 6);
        assert!(evaluate_stoch_rsi(&[0.5; 10], 5, &c).is_err());
    }

    #[test]
    fn huge_slope_lookback_reports_missing_history() {
        let mut c = cfg();
        c.slope_lookback = usize::MAX;
        assert_eq!(c.required_history(), usize::MAX);
        assert_eq!(
            evaluate_stoch_rsi(&[0.5; 10], 5, &c),
            Err(EvalError::NotEnoughData {
                needed: usize::MAX,
                available: 6
            })
        );
    }

    // ── Layers ──

    #[test]
    fn neutral_value_scores_zero_without_components() {
        let res = evaluate_stoch_rsi(&[0.5; 6], 5, &cfg()).unwrap();
        assert_eq!(res.score, 0.0);
        assert!(res.signals.is_empty());
        assert!(res.components.is_empty());
    }

    #[test]
    fn layer_boundaries() {
        let at = |v: f64| {
            let series = [0.5, 0.5, 0.5, 0.5, 0.5, v];
            evaluate_stoch_rsi(&series, 5, &cfg()).unwrap()
        };
        assert_eq!(at(0.10).components["layer"], 1.0);
        assert_eq!(at(0.05).components["layer"], 2.0);
        assert!(at(0.80).components.is_empty());
        assert_eq!(at(0.90).components["layer"], -1.0);
        assert_eq!(at(0.95).components["layer"], -2.0);
    }

    // ── Bottom rise and persistence ──

    #[test]
    fn bottom_rise_in_oversold_zone() {
        // Rising over the last 2 steps, slope over 3 bars positive, still < 0.20.
        let series = [0.30, 0.20, 0.05, 0.08, 0.12, 0.15];
        let res = evaluate_stoch_rsi(&series, 5, &cfg()).unwrap();
        assert_eq!(res.components["layer"], 1.0);
        assert_eq!(res.components["bottom_rise"], 1.0);
        assert_eq!(res.components["persist_os"], 0.5);
        assert_eq!(res.score, 2.5);
        assert_eq!(
            res.signals,
            vec![
                "StochRSI oversold",
                "StochRSI bottom rising",
                "StochRSI oversold persisting"
            ]
        );
    }

    #[test]
    fn rise_checks_only_the_trailing_steps() {
        // The flat pair sits before the two checked steps.
        let series = [0.30, 0.20, 0.05, 0.05, 0.08, 0.12];
        let res = evaluate_stoch_rsi(&series, 5, &cfg()).unwrap();
        assert!(res.components.contains_key("bottom_rise"));
        let series = [0.30, 0.20, 0.05, 0.08, 0.08, 0.12];
        let res = evaluate_stoch_rsi(&series, 5, &cfg()).unwrap();
        assert!(!res.components.contains_key("bottom_rise"));
    }

    #[test]
    fn overbought_persistence_is_strict() {
        let series = [0.5, 0.5, 0.5, 0.85, 0.80, 0.95];
        let res = evaluate_stoch_rsi(&series, 5, &cfg()).unwrap();
        assert!(!res.components.contains_key("persist_ob"));

        let series = [0.5, 0.5, 0.5, 0.85, 0.81, 0.95];
        let res = evaluate_stoch_rsi(&series, 5, &cfg()).unwrap();
        assert_eq!(res.components["persist_ob"], -0.5);
        assert_eq!(res.score, -2.5);
    }

    // ── Percentile mode ──

    #[test]
    fn percentile_mode_reads_trailing_window() {
        let series: Vec<f64> = (0..20).map(|i| i as f64 / 20.0).collect();
        let mut c = cfg();
        c.use_percentile = true;
        c.percentile_window = 11;
        // Window is series[9..=19] = 0.45..=0.95; the last value is its max.
        let res = evaluate_stoch_rsi(&series, 19, &c).unwrap();
        // ob = 0.85, severe ob = 0.925; 0.95 > 0.925.
        assert_eq!(res.components["layer"], -2.0);
        // 0.85 is the threshold itself, so the window is not strictly above.
        assert!(!res.components.contains_key("persist_ob"));
    }

    #[test]
    fn short_percentile_window_keeps_static_bands() {
        let series: Vec<f64> = (0..20).map(|i| i as f64 / 20.0).collect();
        let mut c = cfg();
        c.use_percentile = true;
        c.percentile_window = 10;
        // Static bands: 0.85 sits in (0.80, 0.90].
        let res = evaluate_stoch_rsi(&series, 17, &c).unwrap();
        assert_eq!(res.components["layer"], -1.0);
    }

    #[derive(Debug)]
    struct FixedPercentile(f64);

    impl Percentile for FixedPercentile {
        fn percentile(&self, _window: &[f64], p: f64) -> f64 {
            if p < 0.5 {
                self.0
            } else {
                1.0 - self.0
            }
        }
    }

    #[test]
    fn custom_percentile_strategy_is_used() {
        let mut c = cfg();
        c.use_percentile = true;
        c.percentile_window = 50;
        c.percentile = Arc::new(FixedPercentile(0.4));
        // os = 0.4, severe os = 0.2; 0.3 is plain oversold.
        let series = [0.5, 0.5, 0.5, 0.5, 0.5, 0.3];
        let res = evaluate_stoch_rsi(&series, 5, &c).unwrap();
        assert_eq!(res.components["layer"], 1.0);
    }

    #[test]
    fn config_deserializes_with_default_strategy() {
        let c: StochRsiConfig = serde_json::from_str(r#"{"oversold": 0.25}"#).unwrap();
        assert_eq!(c.oversold, 0.25);
        assert_eq!(c.percentile.percentile(&[1.0, 3.0], 0.5), 2.0);
    }
}
