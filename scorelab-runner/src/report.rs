//! Reporting and export: console lines, trade CSV and JSON.
//!
//! Console format:
//! - bar line: `(<index>) <date> = $ <close> | Score:<score> | TradeSignal:<BUY|SELL|HOLD> | Signals:[a, b]`
//! - trade line: `<date> | <BUY|SELL> @ <price> | PnL: <pnl>`

use std::path::Path;

use anyhow::{Context, Result};
use scorelab_core::{BarScore, Candle, Trade, TradeLog, TradeStats};

use crate::runner::BacktestReport;

// ─── Console ────────────────────────────────────────────────────────

pub fn format_bar_line(candle: &Candle, bar: &BarScore) -> String {
    format!(
        "({}) {} = $ {:.4} | Score:{} | TradeSignal:{} | Signals:[{}]",
        bar.index,
        candle.date,
        candle.close,
        bar.score,
        bar.trade_signal(),
        bar.signals.join(", ")
    )
}

pub fn format_trade_line(trade: &Trade) -> String {
    format!(
        "{} | {} @ {:.4} | PnL: {:.4}",
        trade.date, trade.signal, trade.price, trade.pnl
    )
}

pub fn format_stats(stats: &TradeStats) -> String {
    format!(
        "Total PnL: {:.4} | Trades: {} | Wins: {} | Losses: {} | Win rate: {:.2}%",
        stats.total_pnl, stats.trade_count, stats.wins, stats.losses, stats.win_rate
    )
}

/// Full console report: the first `print_bars` bar lines, every trade, the
/// open position if any, and the summary.
pub fn render_console(report: &BacktestReport, print_bars: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Source: {} ({} bars)\n",
        report.source, report.bar_count
    ));
    if !report.malformed.is_empty() {
        out.push_str(&format!(
            "Skipped {} malformed rows\n",
            report.malformed.len()
        ));
    }

    for (candle, bar) in report.bars().take(print_bars) {
        out.push_str(&format_bar_line(candle, bar));
        out.push('\n');
    }

    out.push_str(&format!("\nTrades (threshold {}):\n", report.threshold));
    render_trades(&mut out, &report.trade_log);

    out.push_str(&format_stats(&report.stats));
    out.push('\n');
    out
}

fn render_trades(out: &mut String, log: &TradeLog) {
    if log.trades.is_empty() {
        out.push_str("  (none)\n");
    }
    for trade in &log.trades {
        out.push_str(&format_trade_line(trade));
        out.push('\n');
    }
    if let Some(open) = &log.open_position {
        out.push_str(&format!(
            "Open {} since {} @ {:.4}, marked {:.4} (unrealized {:.4})\n",
            open.position, open.entry_date, open.entry_price, open.mark_price, open.unrealized_pnl
        ));
    }
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &BacktestReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BacktestReport to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the trade list as CSV.
///
/// Columns: bar_index, date, signal, action, price, pnl
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["bar_index", "date", "signal", "action", "price", "pnl"])?;

    for t in trades {
        wtr.write_record(&[
            t.bar_index.to_string(),
            t.date.clone(),
            t.signal.to_string(),
            format!("{:?}", t.action).to_lowercase(),
            format!("{:.6}", t.price),
            format!("{:.6}", t.pnl),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Export per-bar scores as CSV.
///
/// Columns: index, date, close, score, trade_signal, signals (`; `-joined)
pub fn export_scores_csv(report: &BacktestReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["index", "date", "close", "score", "trade_signal", "signals"])?;

    for (candle, bar) in report.bars() {
        wtr.write_record(&[
            bar.index.to_string(),
            candle.date.clone(),
            format!("{:.6}", candle.close),
            bar.score.to_string(),
            bar.trade_signal().to_string(),
            bar.signals.join("; "),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
