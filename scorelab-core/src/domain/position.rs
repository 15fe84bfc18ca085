use serde::{Deserialize, Serialize};

/// Position state of the trade state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Flat,
    Long,
    Short,
}

impl Position {
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat)
    }

    /// Unrealized PnL per unit for a position entered at `entry` and marked at `mark`.
    pub fn unrealized_pnl(&self, entry: f64, mark: f64) -> f64 {
        match self {
            Self::Flat => 0.0,
            Self::Long => mark - entry,
            Self::Short => entry - mark,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Flat => "FLAT",
            Self::Long => "LONG",
            Self::Short => "SHORT",
        };
        f.write_str(s)
    }
}
