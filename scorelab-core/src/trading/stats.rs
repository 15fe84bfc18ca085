//! Trade log and summary statistics.
//!
//! Only realized PnL counts. A position still open at the end of the data
//! is reported separately and stays out of every statistic.

use crate::domain::{Position, Trade};
use serde::{Deserialize, Serialize};

/// A position left open when the data ran out, marked to the last price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub position: Position,
    pub entry_index: usize,
    pub entry_date: String,
    pub entry_price: f64,
    pub mark_price: f64,
    pub unrealized_pnl: f64,
}

/// Every trade in bar order, plus any position left open.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TradeLog {
    pub trades: Vec<Trade>,
    pub open_position: Option<OpenPosition>,
}

impl TradeLog {
    pub fn stats(&self) -> TradeStats {
        TradeStats::from_trades(&self.trades)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TradeStats {
    pub total_pnl: f64,
    pub wins: usize,
    pub losses: usize,
    /// Wins plus losses. Entries and break-even exits are not counted.
    pub trade_count: usize,
    /// Percentage of counted trades that won; 0 when none were counted.
    pub win_rate: f64,
}

impl TradeStats {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let total_pnl = trades.iter().map(|t| t.pnl).sum();
        let wins = trades.iter().filter(|t| t.is_winner()).count();
        let losses = trades.iter().filter(|t| t.is_loser()).count();
        let trade_count = wins + losses;
        let win_rate = if trade_count == 0 {
            0.0
        } else {
            wins as f64 / trade_count as f64 * 100.0
        };

        Self {
            total_pnl,
            wins,
            losses,
            trade_count,
            win_rate,
        }
    }
}
