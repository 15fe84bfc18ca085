//! ScoreLab Core — candles, indicators, evaluators, scoring, trade simulation.
//!
//! This crate contains the scoring pipeline:
//! - Domain types (candles, positions, trades)
//! - Indicator library, computed once per run into an `IndicatorSet`
//! - KDJ, StochRSI and RSI evaluators with explanatory signals
//! - Scoring engine summing every rule into one score per bar
//! - Trade state machine and summary statistics
//!
//! No I/O happens here. Logging goes through the injected `EventLog`.

pub mod domain;
pub mod error;
pub mod evaluate;
pub mod indicators;
pub mod log;
pub mod scoring;
pub mod series;
pub mod trading;

pub use domain::{Candle, Position, Trade, TradeAction, TradeSignal};
pub use error::EvalError;
pub use indicators::{IndicatorParams, IndicatorSet};
pub use log::{EventLog, SilentLog, TracingLog};
pub use scoring::{BarScore, ScoringConfig, ScoringEngine};
pub use trading::{backtest_trades, TradeLog, TradeStateMachine, TradeStats};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: shared pipeline types are Send + Sync.
    ///
    /// The runner's threshold sweep hands these to rayon workers.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Candle>();
        require_sync::<Candle>();
        require_send::<Trade>();
        require_sync::<Trade>();
        require_send::<BarScore>();
        require_sync::<BarScore>();
        require_send::<IndicatorSet>();
        require_sync::<IndicatorSet>();
        require_send::<ScoringConfig>();
        require_sync::<ScoringConfig>();
        require_send::<TradeLog>();
        require_sync::<TradeLog>();
        require_send::<TracingLog>();
        require_sync::<TracingLog>();
        require_send::<TradeStateMachine<'static>>();
        require_sync::<TradeStateMachine<'static>>();
    }

    /// Architecture contract: the state machine sees scores and prices only.
    #[test]
    fn state_machine_takes_no_indicator_state() {
        fn _check_signature(sm: &mut TradeStateMachine<'_>) -> Option<Trade> {
            sm.on_bar(0, "d", 1.0, 0)
        }
    }
}
