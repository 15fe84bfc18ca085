//! CR energy indicator.
//!
//! mid[j] = (high[j-1] + low[j-1]) / 2, the previous bar's midpoint.
//! CR[i] = sum(max(0, high[j] - mid[j])) / sum(max(0, mid[j] - low[j])) * 100
//! over j in the trailing `period` bars ending at i.
//! Zero before index `period` and whenever the denominator is zero.

pub fn cr(highs: &[f64], lows: &[f64], period: usize) -> Vec<f64> {
    let n = highs.len().min(lows.len());
    let mut result = vec![0.0; highs.len()];

    if period == 0 || n <= period {
        return result;
    }

    for i in period..n {
        let mut up = 0.0;
        let mut down = 0.0;
        for j in (i + 1 - period)..=i {
            let mid = (highs[j - 1] + lows[j - 1]) / 2.0;
            up += (highs[j] - mid).max(0.0);
            down += (mid - lows[j]).max(0.0);
        }
        if down != 0.0 {
            result[i] = up / down * 100.0;
        }
    }

    result
}
