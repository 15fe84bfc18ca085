//! Position state machine driven by the bar score.
//!
//! ```text
//! FLAT  --score >=  t--> LONG   (BUY, open)
//! FLAT  --score <= -t--> SHORT  (SELL, open)
//! LONG  --score <= -t--> FLAT   (SELL, close, pnl = exit - entry)
//! SHORT --score >=  t--> FLAT   (BUY, close, pnl = entry - exit)
//! ```
//!
//! At most one transition per bar. Closing does not reverse into the
//! opposite side on the same bar.

use super::stats::{OpenPosition, TradeLog};
use crate::domain::{Candle, Position, Trade, TradeAction, TradeSignal};
use crate::log::EventLog;
use crate::scoring::BarScore;

pub struct TradeStateMachine<'a> {
    threshold: i32,
    position: Position,
    entry_index: usize,
    entry_date: String,
    entry_price: f64,
    trades: Vec<Trade>,
    log: &'a dyn EventLog,
}

impl<'a> TradeStateMachine<'a> {
    pub fn new(threshold: i32, log: &'a dyn EventLog) -> Self {
        assert!(threshold >= 1, "trade threshold must be at least 1");
        Self {
            threshold,
            position: Position::Flat,
            entry_index: 0,
            entry_date: String::new(),
            entry_price: 0.0,
            trades: Vec::new(),
            log,
        }
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Feed one bar. Returns the trade recorded on this bar, if any.
    pub fn on_bar(&mut self, index: usize, date: &str, price: f64, score: i32) -> Option<Trade> {
        let t = self.threshold;
        let (signal, action, pnl, next) = match self.position {
            Position::Flat if score >= t => {
                (TradeSignal::Buy, TradeAction::Open, 0.0, Position::Long)
            }
            Position::Flat if score <= -t => {
                (TradeSignal::Sell, TradeAction::Open, 0.0, Position::Short)
            }
            Position::Long if score <= -t => (
                TradeSignal::Sell,
                TradeAction::Close,
                price - self.entry_price,
                Position::Flat,
            ),
            Position::Short if score >= t => (
                TradeSignal::Buy,
                TradeAction::Close,
                self.entry_price - price,
                Position::Flat,
            ),
            _ => return None,
        };

        if action == TradeAction::Open {
            self.entry_index = index;
            self.entry_date = date.to_string();
            self.entry_price = price;
        }
        self.position = next;

        let trade = Trade {
            bar_index: index,
            date: date.to_string(),
            signal,
            action,
            price,
            pnl,
        };
        self.log.trade_recorded(&trade);
        self.trades.push(trade.clone());
        Some(trade)
    }

    /// Stop feeding bars. An open position is marked at `mark_price`.
    pub fn finish(self, mark_price: f64) -> TradeLog {
        let open_position = if self.position.is_flat() {
            None
        } else {
            Some(OpenPosition {
                position: self.position,
                entry_index: self.entry_index,
                entry_date: self.entry_date,
                entry_price: self.entry_price,
                mark_price,
                unrealized_pnl: self.position.unrealized_pnl(self.entry_price, mark_price),
            })
        };

        TradeLog {
            trades: self.trades,
            open_position,
        }
    }
}

/// Run the state machine over a whole score timeline.
///
/// Each bar trades at the close of the candle its `index` points to; bars
/// without a candle are ignored.
pub fn backtest_trades(
    scores: &[BarScore],
    candles: &[Candle],
    threshold: i32,
    log: &dyn EventLog,
) -> TradeLog {
    let mut machine = TradeStateMachine::new(threshold, log);
    for bar in scores {
        if let Some(candle) = candles.get(bar.index) {
            machine.on_bar(bar.index, &candle.date, candle.close, bar.score);
        }
    }
    let mark = candles.last().map_or(0.0, |c| c.close);
    machine.finish(mark)
}
