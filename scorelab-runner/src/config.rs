//! Serializable backtest configuration.

use scorelab_core::{IndicatorParams, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound on any evaluator look-back, in bars.
pub const MAX_LOOKBACK_BARS: usize = 10_000;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where the candles come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSource {
    /// An explicit CSV file.
    Csv { path: PathBuf },
    /// A catalog instrument, resolved to `<data_dir>/<CODE>_<NUMBER>_data.csv`.
    Instrument {
        code: String,
        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,
    },
    /// Seeded random walk, for demos and tests.
    Synthetic { bars: usize, seed: u64 },
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data_set")
}

impl Default for DataSource {
    fn default() -> Self {
        Self::Synthetic { bars: 250, seed: 42 }
    }
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Csv { path } => path.display().to_string(),
            Self::Instrument { code, .. } => format!("instrument {code}"),
            Self::Synthetic { bars, seed } => format!("synthetic ({bars} bars, seed {seed})"),
        }
    }
}

/// Everything needed to reproduce one backtest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub data: DataSource,
    pub indicators: IndicatorParams,
    pub scoring: ScoringConfig,
    /// Entry/exit threshold of the trade state machine.
    pub threshold: i32,
    /// Number of leading bars echoed to the console report.
    pub print_bars: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            data: DataSource::default(),
            indicators: IndicatorParams::default(),
            scoring: ScoringConfig::default(),
            threshold: 2,
            print_bars: 10,
        }
    }
}

impl BacktestConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold < 1 {
            return Err(invalid(format!(
                "threshold must be at least 1, got {}",
                self.threshold
            )));
        }

        for (name, period) in self.indicators.periods() {
            if period == 0 {
                return Err(invalid(format!("indicators.{name} must be at least 1")));
            }
        }

        let p = &self.indicators;
        if !(p.sar_accel > 0.0 && p.sar_accel <= p.sar_max_accel) {
            return Err(invalid(format!(
                "indicators.sar_accel must be in (0, sar_max_accel], got {} / {}",
                p.sar_accel, p.sar_max_accel
            )));
        }
        if p.bollinger_multiplier <= 0.0 || p.keltner_multiplier <= 0.0 {
            return Err(invalid("band multipliers must be positive".into()));
        }

        let kdj = &self.scoring.kdj;
        if !(kdj.j_extreme_oversold <= kdj.j_oversold
            && kdj.j_oversold < kdj.j_overbought
            && kdj.j_overbought <= kdj.j_extreme_overbought)
        {
            return Err(invalid(
                "scoring.kdj thresholds must satisfy extreme_oversold <= oversold < overbought <= extreme_overbought"
                    .into(),
            ));
        }

        let st = &self.scoring.stoch_rsi;
        let ordered = 0.0 <= st.severe_oversold
            && st.severe_oversold <= st.oversold
            && st.oversold < st.overbought
            && st.overbought <= st.severe_overbought
            && st.severe_overbought <= 1.0;
        if !ordered {
            return Err(invalid(
                "scoring.stoch_rsi bands must satisfy 0 <= severe_oversold <= oversold < overbought <= severe_overbought <= 1"
                    .into(),
            ));
        }
        if st.use_percentile && st.p_oversold >= st.p_overbought {
            return Err(invalid(
                "scoring.stoch_rsi.p_oversold must be below p_overbought".into(),
            ));
        }

        let lookbacks = [
            ("scoring.kdj.persistence_bars", kdj.persistence_bars),
            ("scoring.stoch_rsi.slope_lookback", st.slope_lookback),
            ("scoring.stoch_rsi.min_rise_bars", st.min_rise_bars),
            ("scoring.stoch_rsi.crossover_hysteresis", st.crossover_hysteresis),
            ("scoring.stoch_rsi.persist_bars", st.persist_bars),
            ("scoring.stoch_rsi.percentile_window", st.percentile_window),
        ];
        for (name, bars) in lookbacks {
            if bars > MAX_LOOKBACK_BARS {
                return Err(invalid(format!(
                    "{name} must be at most {MAX_LOOKBACK_BARS}, got {bars}"
                )));
            }
        }

        if let DataSource::Synthetic { bars: 0, .. } = self.data {
            return Err(invalid("synthetic data needs at least one bar".into()));
        }

        Ok(())
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share the same RunId.
    pub fn run_id(&self) -> RunId {
        // Only a non-UTF-8 path can fail to serialize; its debug form still identifies it.
        let json = serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"));
        let hash = blake3::hash(json.as_bytes());
        format!("{}", hash.to_hex())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        let config = BacktestConfig::from_toml("").unwrap();
        assert_eq!(config.threshold, 2);
        assert_eq!(config.print_bars, 10);
        assert_eq!(config.data, DataSource::default());
        assert_eq!(config.indicators, IndicatorParams::default());
    }

    #[test]
    fn instrument_source_with_default_dir() {
        let config = BacktestConfig::from_toml(
            r#"
            threshold = 3

            [data]
            type = "instrument"
            code = "PHARMA"

            [indicators]
            kdj_period = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.threshold, 3);
        assert_eq!(config.indicators.kdj_period, 5);
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(
            config.data,
            DataSource::Instrument {
                code: "PHARMA".into(),
                data_dir: PathBuf::from("./data_set"),
            }
        );
    }

    #[test]
    fn zero_threshold_rejected() {
        let err = BacktestConfig::from_toml("threshold = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_period_rejected() {
        let err = BacktestConfig::from_toml("[indicators]\nrsi_period = 0").unwrap_err();
        assert!(err.to_string().contains("rsi_period"));
    }

    #[test]
    fn unordered_kdj_thresholds_rejected() {
        let err = BacktestConfig::from_toml("[scoring.kdj]\nj_oversold = 85.0").unwrap_err();
        assert!(err.to_string().contains("scoring.kdj"));
    }

    #[test]
    fn unordered_stoch_bands_rejected() {
        let err =
            BacktestConfig::from_toml("[scoring.stoch_rsi]\noverbought = 0.1").unwrap_err();
        assert!(err.to_string().contains("scoring.stoch_rsi"));
    }

    #[test]
    fn oversized_lookback_rejected() {
        let mut config = BacktestConfig::default();
        config.scoring.stoch_rsi.slope_lookback = usize::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scoring.stoch_rsi.slope_lookback"));

        let err =
            BacktestConfig::from_toml("[scoring.kdj]\npersistence_bars = 20000").unwrap_err();
        assert!(err.to_string().contains("scoring.kdj.persistence_bars"));

        let mut config = BacktestConfig::default();
        config.scoring.stoch_rsi.crossover_hysteresis = MAX_LOOKBACK_BARS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = BacktestConfig::from_toml("threshold = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = BacktestConfig::from_toml_file(Path::new("/nonexistent/scorelab.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn run_id_deterministic() {
        let config = BacktestConfig::default();
        let id1 = config.run_id();
        let id2 = config.run_id();
        assert_eq!(id1, id2, "RunId should be deterministic");
        assert_eq!(id1.len(), 64);
    }

    #[test]
    fn run_id_changes_with_params() {
        let config1 = BacktestConfig::default();
        let mut config2 = BacktestConfig::default();
        config2.threshold = 3;
        assert_ne!(config1.run_id(), config2.run_id());
    }
}
