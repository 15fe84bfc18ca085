//! Scoring configuration.

use crate::evaluate::{KdjConfig, StochRsiConfig};
use serde::{Deserialize, Serialize};

/// How the RSI contributes to the bar score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiRule {
    /// +1 below 30, -1 above 70.
    #[default]
    Zone,
    /// The layered RSI evaluator (+2/+1/-1/-2), rounded.
    Layered,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub kdj: KdjConfig,
    pub stoch_rsi: StochRsiConfig,
    pub rsi_rule: RsiRule,
}
