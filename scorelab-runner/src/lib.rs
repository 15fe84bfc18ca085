//! ScoreLab Runner — backtest orchestration, data loading, reporting, sweeps.
//!
//! This crate builds on `scorelab-core` to provide:
//! - TOML configuration with validation and content-addressed run IDs
//! - Candle loading from CSV files, catalog instruments or synthetic data
//! - Single-backtest runner producing scores, trades and statistics
//! - Console, CSV and JSON reports
//! - Parallel threshold sweeps over one score timeline

pub mod catalog;
pub mod config;
pub mod data_loader;
pub mod report;
pub mod runner;
pub mod sweep;

pub use catalog::{find as find_instrument, instruments, Instrument};
pub use config::{BacktestConfig, ConfigError, DataSource, RunId};
pub use data_loader::{
    generate_synthetic, load_csv, load_source, LoadError, LoadedCandles, MalformedRecord,
};
pub use report::{export_json, export_scores_csv, export_trades_csv, render_console};
pub use runner::{run_backtest, run_on_candles, score_candles, BacktestReport, RunError};
pub use sweep::{best_by_pnl, sweep_thresholds, threshold_range, SweepPoint};
