//! Evaluation errors shared by the evaluators and the scoring engine.

use serde::Serialize;
use thiserror::Error;

/// Errors returned synchronously by evaluators and the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalError {
    /// The series is empty, or the index sits before the history a rule needs.
    #[error("not enough data: need {needed} bars of history, have {available}")]
    NotEnoughData { needed: usize, available: usize },

    /// The index lies outside `[0, len)`.
    #[error("index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl EvalError {
    pub(crate) fn empty() -> Self {
        Self::NotEnoughData {
            needed: 1,
            available: 0,
        }
    }

    /// Bounds check shared by every index-addressed evaluator.
    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if len == 0 {
            return Err(Self::empty());
        }
        if index >= len {
            return Err(Self::IndexOutOfRange { index, len });
        }
        Ok(())
    }
}
