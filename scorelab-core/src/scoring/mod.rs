//! Scoring engine: per-bar aggregation of every indicator rule.

pub mod config;
pub mod engine;

pub use config::{RsiRule, ScoringConfig};
pub use engine::ScoringEngine;

use crate::domain::TradeSignal;
use crate::error::EvalError;
use serde::Serialize;

/// An evaluator whose contribution was dropped for one bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEvaluator {
    pub evaluator: &'static str,
    pub error: EvalError,
}

/// Aggregate score for one bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarScore {
    pub index: usize,
    pub score: i32,
    /// Explanations of every rule that fired, in evaluation order.
    pub signals: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEvaluator>,
}

impl BarScore {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            score: 0,
            signals: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// BUY / SELL / HOLD label for this score.
    pub fn trade_signal(&self) -> TradeSignal {
        TradeSignal::from_score(self.score)
    }

    pub(crate) fn add(&mut self, weight: i32, signal: impl Into<String>) {
        self.score += weight;
        self.signals.push(signal.into());
    }

    pub(crate) fn note(&mut self, signal: impl Into<String>) {
        self.signals.push(signal.into());
    }
}
