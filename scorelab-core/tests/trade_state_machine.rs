//! Scenario tests for the trade state machine.

use scorelab_core::log::{MemoryLog, SilentLog};
use scorelab_core::scoring::BarScore;
use scorelab_core::trading::{backtest_trades, TradeStateMachine};
use scorelab_core::{Candle, Position, TradeAction, TradeSignal};

// ── Helpers ──────────────────────────────────────────────────────────

fn candles(prices: &[f64]) -> Vec<Candle> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| Candle::from_close(format!("d{i}"), p))
        .collect()
}

fn scores(values: &[i32]) -> Vec<BarScore> {
    values
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let mut bar = BarScore::new(i);
            bar.score = s;
            bar
        })
        .collect()
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn buy_then_sell_realizes_price_difference() {
    let log = backtest_trades(
        &scores(&[0, 3, 0, -3, 0]),
        &candles(&[10.0, 11.0, 12.0, 13.0, 14.0]),
        2,
        &SilentLog,
    );

    assert_eq!(log.trades.len(), 2);
    assert_eq!(log.trades[0].signal, TradeSignal::Buy);
    assert_eq!(log.trades[0].bar_index, 1);
    assert_eq!(log.trades[0].price, 11.0);
    assert_eq!(log.trades[1].signal, TradeSignal::Sell);
    assert_eq!(log.trades[1].bar_index, 3);
    assert_eq!(log.trades[1].price, 13.0);
    assert_eq!(log.trades[1].pnl, 2.0);

    let stats = log.stats();
    assert_eq!(stats.total_pnl, 2.0);
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.trade_count, 1);
    assert_eq!(stats.win_rate, 100.0);
}

#[test]
fn timeline_inside_threshold_never_trades() {
    let log = backtest_trades(
        &scores(&[1, -1, 0, 1, -1]),
        &candles(&[5.0, 6.0, 7.0, 8.0, 9.0]),
        2,
        &SilentLog,
    );
    assert!(log.trades.is_empty());
    assert!(log.open_position.is_none());
    assert_eq!(log.stats().total_pnl, 0.0);
    assert_eq!(log.stats().win_rate, 0.0);
}

#[test]
fn several_round_trips_alternate_sides() {
    let log = backtest_trades(
        &scores(&[-4, 0, 4, 4, 0, -2, 2]),
        &candles(&[50.0, 48.0, 45.0, 46.0, 47.0, 44.0, 43.0]),
        2,
        &SilentLog,
    );
    let sides: Vec<_> = log.trades.iter().map(|t| (t.signal, t.action)).collect();
    assert_eq!(
        sides,
        vec![
            (TradeSignal::Sell, TradeAction::Open),
            (TradeSignal::Buy, TradeAction::Close),
            (TradeSignal::Buy, TradeAction::Open),
            (TradeSignal::Sell, TradeAction::Close),
            (TradeSignal::Buy, TradeAction::Open),
        ]
    );
    // Short 50 → 45: +5. Long 46 → 44: -2.
    assert_eq!(log.trades[1].pnl, 5.0);
    assert_eq!(log.trades[3].pnl, -2.0);
    let open = log.open_position.unwrap();
    assert_eq!(open.position, Position::Long);
    assert_eq!(open.entry_price, 43.0);
    assert_eq!(open.unrealized_pnl, 0.0);
}

#[test]
fn higher_threshold_filters_weaker_scores() {
    let s = scores(&[3, 0, -3, 5, -5]);
    let c = candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
    let loose = backtest_trades(&s, &c, 2, &SilentLog);
    let strict = backtest_trades(&s, &c, 4, &SilentLog);
    assert_eq!(loose.trades.len(), 4);
    assert_eq!(strict.trades.len(), 2);
    assert_eq!(strict.trades[0].bar_index, 3);
}

#[test]
fn every_trade_reaches_the_event_log() {
    let log = MemoryLog::new();
    let mut sm = TradeStateMachine::new(2, &log);
    sm.on_bar(0, "d0", 10.0, 2);
    sm.on_bar(1, "d1", 12.0, -2);
    let events = log.events();
    assert_eq!(events.len(), 2);
    assert!(events[1].starts_with("trade 1 SELL @ 12 pnl 2"));
}
