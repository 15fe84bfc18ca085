//! KDJ evaluator.
//!
//! Scores one bar of a K/D/J series with six additive rules, in order:
//! J band, K/D cross, J momentum, K-D spread, persistence in a band, and a
//! three-bar price/J divergence. Signals are appended in the same order.

use crate::error::EvalError;
use crate::series::{KdjSeries, PriceSeries};
use serde::{Deserialize, Serialize};

/// Midline separating low and high cross weights.
const CROSS_MIDLINE: f64 = 50.0;

/// Thresholds and integer weights for the KDJ rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdjConfig {
    pub j_overbought: f64,
    pub j_extreme_overbought: f64,
    pub j_oversold: f64,
    pub j_extreme_oversold: f64,
    pub j_momentum_step: f64,
    pub kd_wide_gap: f64,
    /// Bars J must stay in a band for the persistence rule. 0 or 1 disables it.
    pub persistence_bars: usize,

    pub score_overbought: i32,
    pub score_extreme_overbought: i32,
    pub score_oversold: i32,
    pub score_extreme_oversold: i32,
    pub score_golden: i32,
    pub score_golden_low: i32,
    pub score_death: i32,
    pub score_death_high: i32,
    pub score_j_up: i32,
    pub score_j_down: i32,
    pub score_k_dominant: i32,
    pub score_d_dominant: i32,
    pub score_high_persist: i32,
    pub score_low_persist: i32,
    pub score_bear_divergence: i32,
    pub score_bull_divergence: i32,
}

impl Default for KdjConfig {
    fn default() -> Self {
        Self {
            j_overbought: 80.0,
            j_extreme_overbought: 90.0,
            j_oversold: 20.0,
            j_extreme_oversold: 10.0,
            j_momentum_step: 10.0,
            kd_wide_gap: 20.0,
            persistence_bars: 3,

            score_overbought: -1,
            score_extreme_overbought: -2,
            score_oversold: 1,
            score_extreme_oversold: 2,
            score_golden: 1,
            score_golden_low: 2,
            score_death: -1,
            score_death_high: -2,
            score_j_up: 1,
            score_j_down: -1,
            score_k_dominant: 1,
            score_d_dominant: -1,
            score_high_persist: -1,
            score_low_persist: 1,
            score_bear_divergence: -2,
            score_bull_divergence: 2,
        }
    }
}

/// Integer score and fired signals for one bar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KdjEvaluation {
    pub score: i32,
    pub signals: Vec<String>,
}

impl KdjEvaluation {
    fn fire(&mut self, weight: i32, signal: String) {
        self.score += weight;
        self.signals.push(signal);
    }
}

/// Evaluate the KDJ rules at `index`.
///
/// `prices` feeds the divergence rule, which only runs when it has the same
/// length as `kdj`; pass an empty slice to disable it. Index 0 has no prior
/// bar and scores 0 with no signals.
pub fn evaluate_kdj<S, P>(
    kdj: &S,
    prices: &P,
    index: usize,
    cfg: &KdjConfig,
) -> Result<KdjEvaluation, EvalError>
where
    S: KdjSeries + ?Sized,
    P: PriceSeries + ?Sized,
{
    EvalError::check_index(index, kdj.len())?;

    let mut eval = KdjEvaluation::default();
    if index == 0 {
        return Ok(eval);
    }

    let i = index;
    let (k, d, j) = (kdj.k(i), kdj.d(i), kdj.j(i));
    let (kp, dp, jp) = (kdj.k(i - 1), kdj.d(i - 1), kdj.j(i - 1));

    // Band
    if j >= cfg.j_extreme_overbought {
        eval.fire(
            cfg.score_extreme_overbought,
            format!("KDJ extreme overbought (J >= {:.0})", cfg.j_extreme_overbought),
        );
    } else if j >= cfg.j_overbought {
        eval.fire(
            cfg.score_overbought,
            format!(
                "KDJ overbought ({:.0} <= J < {:.0})",
                cfg.j_overbought, cfg.j_extreme_overbought
            ),
        );
    } else if j <= cfg.j_extreme_oversold {
        eval.fire(
            cfg.score_extreme_oversold,
            format!("KDJ extreme oversold (J <= {:.0})", cfg.j_extreme_oversold),
        );
    } else if j <= cfg.j_oversold {
        eval.fire(
            cfg.score_oversold,
            format!(
                "KDJ oversold ({:.0} < J <= {:.0})",
                cfg.j_extreme_oversold, cfg.j_oversold
            ),
        );
    }

    // Cross
    if kp <= dp && k > d {
        let weight = if cross_level(kp, dp, k, d) < CROSS_MIDLINE {
            cfg.score_golden_low
        } else {
            cfg.score_golden
        };
        eval.fire(weight, format!("KDJ golden cross (weight {weight:+})"));
    }
    if kp >= dp && k < d {
        let weight = if cross_level(kp, dp, k, d) > CROSS_MIDLINE {
            cfg.score_death_high
        } else {
            cfg.score_death
        };
        eval.fire(weight, format!("KDJ death cross (weight {weight:+})"));
    }

    // Momentum
    let delta_j = j - jp;
    if delta_j >= cfg.j_momentum_step {
        eval.fire(
            cfg.score_j_up,
            format!("KDJ momentum up (dJ >= {:.0})", cfg.j_momentum_step),
        );
    } else if delta_j <= -cfg.j_momentum_step {
        eval.fire(
            cfg.score_j_down,
            format!("KDJ momentum down (dJ <= -{:.0})", cfg.j_momentum_step),
        );
    }

    // Spread
    if (k - d).abs() >= cfg.kd_wide_gap {
        if k > d {
            eval.fire(
                cfg.score_k_dominant,
                format!("K > D strong (gap >= {:.0})", cfg.kd_wide_gap),
            );
        } else {
            eval.fire(
                cfg.score_d_dominant,
                format!("K < D weak (gap >= {:.0})", cfg.kd_wide_gap),
            );
        }
    }

    // Persistence: needs a full window of `n` bars ending at `i`.
    let n = cfg.persistence_bars;
    if n > 1 && i + 1 >= n {
        let window = (i + 1 - n)..=i;
        if window.clone().all(|t| kdj.j(t) >= cfg.j_overbought) {
            eval.fire(
                cfg.score_high_persist,
                format!("KDJ high persistence ({n} bars)"),
            );
        }
        if window.clone().all(|t| kdj.j(t) <= cfg.j_oversold) {
            eval.fire(cfg.score_low_persist, format!("KDJ low persistence ({n} bars)"));
        }
    }

    // Divergence
    if i >= 2 && prices.len() == kdj.len() {
        let (p0, p1, p2) = (prices.at(i - 2), prices.at(i - 1), prices.at(i));
        let (j0, j1, j2) = (kdj.j(i - 2), kdj.j(i - 1), j);

        let price_higher = p2 > p1 && p1 > p0;
        let j_higher = j2 > j1 && j1 > j0;
        let price_lower = p2 < p1 && p1 < p0;
        let j_lower = j2 < j1 && j1 < j0;

        if price_higher && !j_higher {
            eval.fire(
                cfg.score_bear_divergence,
                "KDJ bearish divergence (price higher high, J not)".to_string(),
            );
        }
        if price_lower && !j_lower {
            eval.fire(
                cfg.score_bull_divergence,
                "KDJ bullish divergence (price lower low, J not)".to_string(),
            );
        }
    }

    Ok(eval)
}

/// Level at which K meets D between the prior bar and this one.
///
/// K and D are treated as straight segments between the two bars. The
/// caller guarantees they cross, so the slopes differ.
fn cross_level(kp: f64, dp: f64, k: f64, d: f64) -> f64 {
    let denom = (k - kp) - (d - dp);
    if denom == 0.0 {
        return (k + d) / 2.0;
    }
    let t = (dp - kp) / denom;
    kp + t * (k - kp)
}
