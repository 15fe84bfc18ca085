//! Layered RSI evaluator.
//!
//! RSI < 20 → +2, [20, 30) → +1, (70, 80] → -1, > 80 → -2.

use super::EvalResult;
use crate::error::EvalError;

const SEVERE_OVERSOLD: f64 = 20.0;
const OVERSOLD: f64 = 30.0;
const OVERBOUGHT: f64 = 70.0;
const SEVERE_OVERBOUGHT: f64 = 80.0;

pub fn evaluate_rsi(series: &[f64], index: usize) -> Result<EvalResult, EvalError> {
    EvalError::check_index(index, series.len())?;

    let rsi = series[index];
    let mut res = EvalResult::default();

    if rsi < SEVERE_OVERSOLD {
        res.accumulate("rsi_severe_os", 2.0);
        res.signal("RSI severe oversold");
    } else if rsi < OVERSOLD {
        res.accumulate("rsi_os", 1.0);
        res.signal("RSI oversold");
    } else if rsi > OVERBOUGHT && rsi <= SEVERE_OVERBOUGHT {
        res.accumulate("rsi_ob", -1.0);
        res.signal("RSI overbought");
    } else if rsi > SEVERE_OVERBOUGHT {
        res.accumulate("rsi_severe_ob", -2.0);
        res.signal("RSI severe overbought");
    }

    Ok(res.finish())
}
