//! Domain types for ScoreLab

pub mod candle;
pub mod position;
pub mod trade;

pub use candle::{Candle, Columns};
pub use position::Position;
pub use trade::{Trade, TradeAction, TradeSignal};
