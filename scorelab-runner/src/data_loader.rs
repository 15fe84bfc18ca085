//! Candle loading: CSV files, catalog instruments and synthetic data.
//!
//! CSV layout: one header row, then `date, open, high, low, close[, volume]`.
//! Only the date and close columns are required. A missing or empty open,
//! high or low falls back to the close. Rows whose close cannot be parsed are
//! reported as malformed and skipped; the rest of the file still loads.

use crate::catalog;
use crate::config::DataSource;
use scorelab_core::Candle;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DATE_COLUMN: usize = 0;
const OPEN_COLUMN: usize = 1;
const HIGH_COLUMN: usize = 2;
const LOW_COLUMN: usize = 3;
const CLOSE_COLUMN: usize = 4;
const VOLUME_COLUMN: usize = 5;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", path.display())]
    MissingDataFile { path: PathBuf },

    #[error("unknown instrument '{code}'")]
    UnknownInstrument { code: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no valid candles in {source_name}")]
    NoCandles { source_name: String },
}

/// A data row that was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedRecord {
    /// 1-based line number in the file.
    pub line: u64,
    pub date: String,
    pub value: String,
    pub reason: String,
}

/// Result of loading candles from any source.
#[derive(Debug, Clone)]
pub struct LoadedCandles {
    pub candles: Vec<Candle>,
    pub malformed: Vec<MalformedRecord>,
    /// BLAKE3 hash of the loaded candles.
    pub dataset_hash: String,
    pub source_name: String,
    /// Whether the candles were generated rather than read.
    pub synthetic: bool,
}

impl LoadedCandles {
    fn new(
        candles: Vec<Candle>,
        malformed: Vec<MalformedRecord>,
        source_name: String,
        synthetic: bool,
    ) -> Self {
        Self {
            dataset_hash: compute_dataset_hash(&candles),
            candles,
            malformed,
            source_name,
            synthetic,
        }
    }
}

/// Load candles from a configured source.
pub fn load_source(source: &DataSource) -> Result<LoadedCandles, LoadError> {
    match source {
        DataSource::Csv { path } => load_csv(path),
        DataSource::Instrument { code, data_dir } => {
            let instrument = catalog::find(code).ok_or_else(|| LoadError::UnknownInstrument {
                code: code.clone(),
            })?;
            load_csv(&instrument.data_file(data_dir))
        }
        DataSource::Synthetic { bars, seed } => {
            let candles = generate_synthetic(*bars, *seed);
            tracing::info!(bars, seed, "generated synthetic candles");
            Ok(LoadedCandles::new(
                candles,
                Vec::new(),
                source.describe(),
                true,
            ))
        }
    }
}

/// Load a CSV file of candles.
pub fn load_csv(path: &Path) -> Result<LoadedCandles, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::MissingDataFile {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let source_name = path.display().to_string();
    let (candles, malformed) = read_candles(file)?;
    if candles.is_empty() {
        return Err(LoadError::NoCandles { source_name });
    }

    tracing::info!(
        path = %source_name,
        candles = candles.len(),
        malformed = malformed.len(),
        "loaded candles"
    );
    Ok(LoadedCandles::new(candles, malformed, source_name, false))
}

/// Parse candles from any CSV reader. The first row is a header.
pub fn read_candles<R: Read>(reader: R) -> Result<(Vec<Candle>, Vec<MalformedRecord>), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candles = Vec::new();
    let mut malformed = Vec::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let date = record.get(DATE_COLUMN).unwrap_or_default().to_string();
        let raw_close = record.get(CLOSE_COLUMN).unwrap_or_default();

        let close = match parse_price(raw_close) {
            Ok(close) => close,
            Err(reason) => {
                tracing::warn!(line, date = %date, value = raw_close, %reason, "skipping malformed row");
                malformed.push(MalformedRecord {
                    line,
                    date,
                    value: raw_close.to_string(),
                    reason,
                });
                continue;
            }
        };

        let field_or_close = |column: usize| {
            record
                .get(column)
                .and_then(|raw| parse_price(raw).ok())
                .unwrap_or(close)
        };
        let open = field_or_close(OPEN_COLUMN);
        let high = field_or_close(HIGH_COLUMN).max(open).max(close);
        let low = field_or_close(LOW_COLUMN).min(open).min(close);

        let mut candle = Candle::new(date, open, high, low, close);
        if let Some(volume) = record
            .get(VOLUME_COLUMN)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
        {
            candle = candle.with_volume(volume);
        }
        candles.push(candle);
    }

    Ok((candles, malformed))
}

fn parse_price(raw: &str) -> Result<f64, String> {
    if raw.is_empty() {
        return Err("missing value".into());
    }
    let value: f64 = raw.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if !value.is_finite() {
        return Err("value is not finite".into());
    }
    Ok(value)
}

/// Deterministic random-walk candles. The same seed always yields the same data.
pub fn generate_synthetic(bars: usize, seed: u64) -> Vec<Candle> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed_bytes = blake3::hash(&seed.to_le_bytes());
    let mut rng = StdRng::from_seed(*seed_bytes.as_bytes());

    let mut candles = Vec::with_capacity(bars);
    let mut price = 10.0_f64;

    for i in 0..bars {
        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000.0..5_000_000.0);

        candles.push(
            Candle::new(format!("day-{:05}", i + 1), open, high, low, close).with_volume(volume),
        );
        price = close;
    }

    candles
}

/// BLAKE3 hash over every candle field, in order.
pub fn compute_dataset_hash(candles: &[Candle]) -> String {
    let mut hasher = blake3::Hasher::new();
    for candle in candles {
        hasher.update(candle.date.as_bytes());
        hasher.update(&candle.open.to_le_bytes());
        hasher.update(&candle.high.to_le_bytes());
        hasher.update(&candle.low.to_le_bytes());
        hasher.update(&candle.close.to_le_bytes());
        hasher.update(&candle.volume.unwrap_or(-1.0).to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
