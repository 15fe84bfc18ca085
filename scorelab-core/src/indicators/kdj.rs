//! KDJ stochastic oscillator.
//!
//! RSV = (close - lowest_low) / (highest_high - lowest_low) * 100 over `period`.
//! K = K_prev * 2/3 + RSV / 3, D = D_prev * 2/3 + K / 3, J = 3K - 2D.
//! Seed K = D = 50. Warm-up bars (before period-1) carry the neutral seed.
//! A bar whose window has high == low is skipped: it repeats the prior
//! triple and leaves the recursion untouched.

use super::window_extremes;
use serde::{Deserialize, Serialize};

/// One K/D/J reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KdjValue {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

impl KdjValue {
    pub const SEED: f64 = 50.0;

    pub fn new(k: f64, d: f64, j: f64) -> Self {
        Self { k, d, j }
    }

    /// The neutral reading every KDJ series starts from.
    pub fn seed() -> Self {
        Self::new(Self::SEED, Self::SEED, Self::SEED)
    }
}

impl Default for KdjValue {
    fn default() -> Self {
        Self::seed()
    }
}

pub fn kdj(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<KdjValue> {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut result = vec![KdjValue::seed(); closes.len()];

    if period == 0 || n < period {
        return result;
    }

    let mut k = KdjValue::SEED;
    let mut d = KdjValue::SEED;
    let mut last = KdjValue::seed();

    for i in (period - 1)..n {
        let start = i + 1 - period;
        if let Some((high, low)) = window_extremes(&highs[start..=i], &lows[start..=i]) {
            if high != low {
                let rsv = (closes[i] - low) / (high - low) * 100.0;
                k = k * 2.0 / 3.0 + rsv / 3.0;
                d = d * 2.0 / 3.0 + k / 3.0;
                last = KdjValue::new(k, d, 3.0 * k - 2.0 * d);
            }
        }
        result[i] = last;
    }

    result
}
