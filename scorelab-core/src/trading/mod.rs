//! Trade simulation over a score timeline.

pub mod state_machine;
pub mod stats;

pub use state_machine::{backtest_trades, TradeStateMachine};
pub use stats::{OpenPosition, TradeLog, TradeStats};
