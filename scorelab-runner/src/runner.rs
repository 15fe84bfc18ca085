//! Backtest runner: wires together loading, indicators, scoring and trading.
//!
//! Two entry points:
//! - `run_backtest()`: validates the config, loads its data source, then runs. Used by the CLI.
//! - `run_on_candles()`: takes pre-loaded candles. Used by tests and the CLI's retry path.

use serde::Serialize;
use thiserror::Error;

use scorelab_core::{
    backtest_trades, BarScore, Candle, IndicatorSet, ScoringEngine, TracingLog, TradeLog,
    TradeStats,
};

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::data_loader::{load_source, LoadError, LoadedCandles, MalformedRecord};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Current schema version for exported reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one backtest run.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub schema_version: u32,
    pub run_id: RunId,
    pub source: String,
    pub dataset_hash: String,
    pub synthetic: bool,
    pub threshold: i32,
    pub bar_count: usize,
    /// Largest indicator warm-up; bars before it score on partial rules.
    pub warmup_bars: usize,
    pub candles: Vec<Candle>,
    pub scores: Vec<BarScore>,
    pub trade_log: TradeLog,
    pub stats: TradeStats,
    pub malformed: Vec<MalformedRecord>,
}

impl BacktestReport {
    /// Bars paired with their candles, in order.
    pub fn bars(&self) -> impl Iterator<Item = (&Candle, &BarScore)> {
        self.scores
            .iter()
            .filter_map(|bar| self.candles.get(bar.index).map(|c| (c, bar)))
    }
}

/// Run a backtest from a config, loading its data source.
pub fn run_backtest(config: &BacktestConfig) -> Result<BacktestReport, RunError> {
    config.validate()?;
    let loaded = load_source(&config.data)?;
    Ok(run_on_candles(config, loaded))
}

/// Run a backtest over candles that were already loaded.
pub fn run_on_candles(config: &BacktestConfig, loaded: LoadedCandles) -> BacktestReport {
    let LoadedCandles {
        candles,
        malformed,
        dataset_hash,
        source_name,
        synthetic,
    } = loaded;

    let indicators = IndicatorSet::compute(&candles, &config.indicators);
    let scores = score_with(config, &indicators, &candles);
    let trade_log = backtest_trades(&scores, &candles, config.threshold, &TracingLog);
    let stats = trade_log.stats();
    let warmup_bars = indicators.max_warmup();

    tracing::info!(
        source = %source_name,
        bars = candles.len(),
        trades = trade_log.trades.len(),
        total_pnl = stats.total_pnl,
        win_rate = stats.win_rate,
        "backtest complete"
    );

    BacktestReport {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        source: source_name,
        dataset_hash,
        synthetic,
        threshold: config.threshold,
        bar_count: candles.len(),
        warmup_bars,
        candles,
        scores,
        trade_log,
        stats,
        malformed,
    }
}

/// Precompute indicators and score every bar.
pub fn score_candles(config: &BacktestConfig, candles: &[Candle]) -> Vec<BarScore> {
    let indicators = IndicatorSet::compute(candles, &config.indicators);
    score_with(config, &indicators, candles)
}

fn score_with(
    config: &BacktestConfig,
    indicators: &IndicatorSet,
    candles: &[Candle],
) -> Vec<BarScore> {
    let log = TracingLog;
    ScoringEngine::new(indicators, candles, &config.scoring, &log).score_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataSource;

    #[test]
    fn synthetic_run_produces_aligned_scores() {
        let config = BacktestConfig {
            data: DataSource::Synthetic { bars: 120, seed: 3 },
            ..BacktestConfig::default()
        };
        let report = run_backtest(&config).unwrap();
        assert_eq!(report.bar_count, 120);
        assert_eq!(report.scores.len(), 120);
        assert!(report.synthetic);
        assert_eq!(report.warmup_bars, 33);
        assert!(report
            .scores
            .iter()
            .enumerate()
            .all(|(i, bar)| bar.index == i));
        assert_eq!(report.bars().count(), 120);
    }

    #[test]
    fn identical_configs_reproduce() {
        let config = BacktestConfig::default();
        let a = run_backtest(&config).unwrap();
        let b = run_backtest(&config).unwrap();
        assert_eq!(a.run_id, b.run_id);
        assert_eq!(a.dataset_hash, b.dataset_hash);
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.trade_log, b.trade_log);
    }

    #[test]
    fn invalid_config_fails_before_loading() {
        let config = BacktestConfig {
            threshold: 0,
            ..BacktestConfig::default()
        };
        assert!(matches!(run_backtest(&config), Err(RunError::Config(_))));
    }
}
