//! Parabolic SAR — Wilder's acceleration factor system.
//!
//! Inherently sequential: maintains direction, extreme point (EP) and
//! acceleration factor (AF). Starts long at bar 0 with SAR = low[0] and
//! EP = high[0]. AF starts at `accel` and grows by `accel` on every new
//! extreme, capped at `max_accel`. When price crosses SAR the trend flips,
//! SAR resets to the prior EP and AF resets to `accel`.

pub fn parabolic_sar(highs: &[f64], lows: &[f64], accel: f64, max_accel: f64) -> Vec<f64> {
    let n = highs.len().min(lows.len());
    let mut result = vec![0.0; highs.len()];

    if n == 0 || accel <= 0.0 {
        return result;
    }

    let mut is_long = true;
    let mut af = accel;
    let mut ep = highs[0];
    let mut sar = lows[0];
    result[0] = sar;

    for i in 1..n {
        let mut new_sar = sar + af * (ep - sar);

        if is_long {
            // In uptrend: SAR must not be above the two previous lows
            new_sar = new_sar.min(lows[i - 1]);
            if i >= 2 {
                new_sar = new_sar.min(lows[i - 2]);
            }

            if lows[i] < new_sar {
                is_long = false;
                new_sar = ep;
                ep = lows[i];
                af = accel;
            } else if highs[i] > ep {
                ep = highs[i];
                af = (af + accel).min(max_accel);
            }
        } else {
            // In downtrend: SAR must not be below the two previous highs
            new_sar = new_sar.max(highs[i - 1]);
            if i >= 2 {
                new_sar = new_sar.max(highs[i - 2]);
            }

            if highs[i] > new_sar {
                is_long = true;
                new_sar = ep;
                ep = highs[i];
                af = accel;
            } else if lows[i] < ep {
                ep = lows[i];
                af = (af + accel).min(max_accel);
            }
        }

        sar = new_sar;
        result[i] = sar;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend(n: usize, start: f64, step: f64) -> (Vec<f64>, Vec<f64>) {
        let highs = (0..n).map(|i| start + i as f64 * step + 2.0).collect();
        let lows = (0..n).map(|i| start + i as f64 * step - 1.0).collect();
        (highs, lows)
    }

    #[test]
    fn uptrend_sar_below_lows() {
        let (highs, lows) = trend(10, 100.0, 3.0);
        let sar = parabolic_sar(&highs, &lows, 0.02, 0.2);
        for i in 1..10 {
            assert!(sar[i] < lows[i], "SAR {} should be below low {} at {i}", sar[i], lows[i]);
        }
    }

    #[test]
    fn downtrend_flips_above_highs() {
        let (highs, lows) = trend(12, 200.0, -3.0);
        let sar = parabolic_sar(&highs, &lows, 0.02, 0.2);
        let found_above = (2..12).any(|i| sar[i] > highs[i]);
        assert!(found_above, "SAR should sit above price once the downtrend is detected");
    }

    #[test]
    fn reversal_resets_to_prior_extreme() {
        let highs = [105.0, 108.0, 112.0, 115.0, 114.5, 102.0];
        let lows = [98.0, 101.0, 105.0, 109.0, 100.0, 95.0];
        let sar = parabolic_sar(&highs, &lows, 0.02, 0.2);
        // Bar 4's low (100) pierces the rising SAR: SAR resets to the EP (115).
        assert_eq!(sar[4], 115.0);
        assert!(sar[5] > highs[5]);
    }

    #[test]
    fn af_caps_at_max() {
        let (highs, lows) = trend(40, 100.0, 1.0);
        let capped = parabolic_sar(&highs, &lows, 0.02, 0.06);
        let uncapped = parabolic_sar(&highs, &lows, 0.02, 0.2);
        // A lower cap keeps SAR further from price.
        assert!(capped[39] < uncapped[39]);
    }

    #[test]
    fn empty_input() {
        assert!(parabolic_sar(&[], &[], 0.02, 0.2).is_empty());
    }
}
