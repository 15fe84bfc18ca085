//! Trade — one entry or exit recorded by the trade state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction label of a bar or a trade.
///
/// `Hold` only appears as a per-bar classification; trades are always
/// `Buy` or `Sell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSignal {
    Buy,
    Sell,
    Hold,
}

impl TradeSignal {
    /// Score at or above which a bar is labelled `Buy` (and at or below the
    /// negation of which it is labelled `Sell`).
    pub const LABEL_THRESHOLD: i32 = 2;

    /// Classify a bar score. Independent of the state machine's threshold.
    pub fn from_score(score: i32) -> Self {
        if score >= Self::LABEL_THRESHOLD {
            Self::Buy
        } else if score <= -Self::LABEL_THRESHOLD {
            Self::Sell
        } else {
            Self::Hold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a trade opened or closed a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Open,
    Close,
}

/// A single entry or exit. Entries carry `pnl == 0.0`; exits carry the
/// realized per-unit PnL of the round trip they complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub bar_index: usize,
    pub date: String,
    pub signal: TradeSignal,
    pub action: TradeAction,
    pub price: f64,
    pub pnl: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.pnl < 0.0
    }
}
