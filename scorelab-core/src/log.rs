//! Logging capability injected into the scoring engine and trade state machine.
//!
//! Core components never reach for a process-wide logger. They receive an
//! `EventLog` at construction; `SilentLog` keeps them side-effect free in
//! tests, `TracingLog` forwards to `tracing` for whatever subscriber the
//! binary installed.

use crate::domain::Trade;
use crate::error::EvalError;
use crate::scoring::BarScore;

/// Receiver for pipeline events.
pub trait EventLog: Send + Sync {
    /// An evaluator failed for one bar; its contribution was skipped.
    fn evaluator_skipped(&self, evaluator: &str, index: usize, error: &EvalError);

    /// A bar finished scoring.
    fn bar_scored(&self, bar: &BarScore);

    /// The trade state machine appended a trade.
    fn trade_recorded(&self, trade: &Trade);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentLog;

impl EventLog for SilentLog {
    fn evaluator_skipped(&self, _evaluator: &str, _index: usize, _error: &EvalError) {}

    fn bar_scored(&self, _bar: &BarScore) {}

    fn trade_recorded(&self, _trade: &Trade) {}
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl EventLog for TracingLog {
    fn evaluator_skipped(&self, evaluator: &str, index: usize, error: &EvalError) {
        tracing::debug!(evaluator, index, error = %error, "evaluator skipped for bar");
    }

    fn bar_scored(&self, bar: &BarScore) {
        tracing::trace!(
            index = bar.index,
            score = bar.score,
            signals = bar.signals.len(),
            "bar scored"
        );
    }

    fn trade_recorded(&self, trade: &Trade) {
        tracing::info!(
            index = trade.bar_index,
            date = %trade.date,
            signal = %trade.signal,
            action = ?trade.action,
            price = trade.price,
            pnl = trade.pnl,
            "trade recorded"
        );
    }
}

/// Collects events in memory. Used by tests that assert on what was logged.
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: std::sync::Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, event: String) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl EventLog for MemoryLog {
    fn evaluator_skipped(&self, evaluator: &str, index: usize, error: &EvalError) {
        self.push(format!("skipped {evaluator} at {index}: {error}"));
    }

    fn bar_scored(&self, bar: &BarScore) {
        self.push(format!("scored {} = {}", bar.index, bar.score));
    }

    fn trade_recorded(&self, trade: &Trade) {
        self.push(format!(
            "trade {} {} @ {} pnl {}",
            trade.bar_index, trade.signal, trade.price, trade.pnl
        ));
    }
}
