//! Per-bar evaluators.
//!
//! Each evaluator reads precomputed series at one index and returns a score
//! with human-readable signals. They keep no state between calls, so the
//! same index always yields the same result.

pub mod kdj;
pub mod rsi;
pub mod stoch_rsi;

pub use kdj::{evaluate_kdj, KdjConfig, KdjEvaluation};
pub use rsi::evaluate_rsi;
pub use stoch_rsi::{
    evaluate_stoch_rsi, percentile_linear, LinearPercentile, Percentile, StochRsiConfig,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Components smaller than this are not recorded.
const COMPONENT_EPSILON: f64 = 1e-12;

/// Result of a fractional-score evaluator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvalResult {
    /// Sum of `components`.
    pub score: f64,
    pub signals: Vec<String>,
    /// Named sub-scores, for inspection and tuning.
    pub components: BTreeMap<String, f64>,
}

impl EvalResult {
    /// Add `value` to the named component, ignoring near-zero contributions.
    pub(crate) fn accumulate(&mut self, key: &str, value: f64) {
        if value.abs() < COMPONENT_EPSILON {
            return;
        }
        *self.components.entry(key.to_string()).or_insert(0.0) += value;
    }

    pub(crate) fn signal(&mut self, text: impl Into<String>) {
        self.signals.push(text.into());
    }

    /// Recompute `score` from the components.
    pub(crate) fn finish(mut self) -> Self {
        self.score = self.components.values().sum();
        self
    }

    /// Score rounded half away from zero, as the engine adds it.
    pub fn rounded_score(&self) -> i32 {
        self.score.round() as i32
    }
}
