//! Threshold sweep: replay one score timeline under several entry/exit thresholds.
//!
//! Indicators and scores are computed once; only the trade state machine
//! reruns per threshold, in parallel.

use rayon::prelude::*;
use serde::Serialize;

use scorelab_core::{backtest_trades, BarScore, Candle, SilentLog, TradeAction, TradeStats};

/// Outcome of one threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub threshold: i32,
    pub round_trips: usize,
    pub stats: TradeStats,
}

/// Inclusive threshold range `lo..=hi`, skipping values below 1.
pub fn threshold_range(lo: i32, hi: i32) -> Vec<i32> {
    (lo.max(1)..=hi).collect()
}

/// Run the state machine once per threshold. Results keep the input order.
pub fn sweep_thresholds(
    scores: &[BarScore],
    candles: &[Candle],
    thresholds: &[i32],
) -> Vec<SweepPoint> {
    thresholds
        .par_iter()
        .filter(|&&t| t >= 1)
        .map(|&threshold| {
            let log = backtest_trades(scores, candles, threshold, &SilentLog);
            let round_trips = log
                .trades
                .iter()
                .filter(|t| t.action == TradeAction::Close)
                .count();
            SweepPoint {
                threshold,
                round_trips,
                stats: log.stats(),
            }
        })
        .collect()
}

/// Point with the highest total PnL; the lower threshold wins ties.
pub fn best_by_pnl(points: &[SweepPoint]) -> Option<&SweepPoint> {
    points.iter().fold(None, |best: Option<&SweepPoint>, p| match best {
        Some(b) if b.stats.total_pnl > p.stats.total_pnl => Some(b),
        Some(b) if b.stats.total_pnl == p.stats.total_pnl && b.threshold <= p.threshold => Some(b),
        _ => Some(p),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(scores: &[i32], prices: &[f64]) -> (Vec<BarScore>, Vec<Candle>) {
        let bars = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let mut bar = BarScore::new(i);
                bar.score = s;
                bar
            })
            .collect();
        let candles = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Candle::from_close(format!("d{i}"), p))
            .collect();
        (bars, candles)
    }

    #[test]
    fn higher_threshold_trades_less() {
        let (bars, candles) = timeline(
            &[2, 0, -2, 0, 4, 0, -4],
            &[10.0, 10.5, 11.0, 11.0, 12.0, 12.5, 14.0],
        );
        let points = sweep_thresholds(&bars, &candles, &[2, 4, 5]);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].threshold, 2);
        assert_eq!(points[0].round_trips, 2);
        assert_eq!(points[1].round_trips, 1);
        assert_eq!(points[1].stats.total_pnl, 2.0);
        assert_eq!(points[2].round_trips, 0);
    }

    #[test]
    fn invalid_thresholds_are_dropped() {
        let (bars, candles) = timeline(&[0, 0], &[1.0, 1.0]);
        let points = sweep_thresholds(&bars, &candles, &[0, -1, 1]);
        assert_eq!(points.len(), 1);
        assert_eq!(threshold_range(-2, 3), vec![1, 2, 3]);
    }

    #[test]
    fn best_prefers_lower_threshold_on_tie() {
        let point = |threshold, total_pnl| SweepPoint {
            threshold,
            round_trips: 1,
            stats: TradeStats {
                total_pnl,
                ..TradeStats::default()
            },
        };
        let points = vec![point(1, 1.0), point(2, 3.0), point(3, 3.0)];
        assert_eq!(best_by_pnl(&points).unwrap().threshold, 2);
        assert!(best_by_pnl(&[]).is_none());
    }
}
