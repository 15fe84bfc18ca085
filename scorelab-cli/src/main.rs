//! ScoreLab CLI — run, sweep and list commands.
//!
//! Commands:
//! - `run` — score every bar of one data source and simulate threshold trades
//! - `sweep` — replay one score timeline under a range of thresholds
//! - `list` — show the built-in instrument catalog
//!
//! With no data source on the command line or in the config, `run` and
//! `sweep` ask for an instrument code on stdin, and ask again when the
//! chosen instrument has no data file.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use scorelab_runner::report::{self, render_console, write_artifact};
use scorelab_runner::{
    best_by_pnl, instruments, run_backtest, sweep_thresholds, threshold_range, BacktestConfig,
    BacktestReport, DataSource, LoadError, RunError,
};

#[derive(Parser)]
#[command(
    name = "scorelab",
    about = "ScoreLab CLI — multi-indicator scoring backtester"
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one data source and simulate trades.
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Entry/exit score threshold (overrides the config).
        #[arg(long)]
        threshold: Option<i32>,

        /// Number of leading bars to print (overrides the config).
        #[arg(long)]
        print_bars: Option<usize>,

        /// Write the trade list as CSV.
        #[arg(long)]
        trades_csv: Option<PathBuf>,

        /// Write per-bar scores and signals as CSV.
        #[arg(long)]
        scores_csv: Option<PathBuf>,

        /// Write the full report as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Replay one score timeline under every threshold in `from..=to`.
    Sweep {
        #[command(flatten)]
        source: SourceArgs,

        /// Lowest threshold.
        #[arg(long, default_value_t = 1)]
        from: i32,

        /// Highest threshold.
        #[arg(long, default_value_t = 6)]
        to: i32,
    },
    /// List the instrument catalog.
    List {
        /// Directory holding `<CODE>_<NUMBER>_data.csv` files.
        #[arg(long, default_value = "./data_set")]
        data_dir: PathBuf,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog instrument code (e.g. PHARMA).
    #[arg(long, conflicts_with_all = ["csv", "synthetic"])]
    instrument: Option<String>,

    /// CSV file with `date,open,high,low,close[,volume]` rows.
    #[arg(long, conflicts_with = "synthetic")]
    csv: Option<PathBuf>,

    /// Generate this many synthetic bars instead of reading data.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for synthetic data.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Directory holding instrument data files.
    #[arg(long, default_value = "./data_set")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            source,
            threshold,
            print_bars,
            trades_csv,
            scores_csv,
            json,
        } => {
            let mut config = build_config(&source)?;
            if let Some(t) = threshold {
                config.threshold = t;
            }
            if let Some(n) = print_bars {
                config.print_bars = n;
            }
            run_cmd(config, trades_csv, scores_csv, json)
        }
        Commands::Sweep { source, from, to } => sweep_cmd(build_config(&source)?, from, to),
        Commands::List { data_dir } => {
            list_cmd(&data_dir);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (or defaults), with the data source replaced by any source flag.
/// With neither, the instrument is chosen interactively.
fn build_config(args: &SourceArgs) -> Result<BacktestConfig> {
    let mut config = match &args.config {
        Some(path) => BacktestConfig::from_toml_file(path)?,
        None => BacktestConfig::default(),
    };

    if let Some(code) = &args.instrument {
        config.data = DataSource::Instrument {
            code: code.clone(),
            data_dir: args.data_dir.clone(),
        };
    } else if let Some(path) = &args.csv {
        config.data = DataSource::Csv { path: path.clone() };
    } else if let Some(bars) = args.synthetic {
        config.data = DataSource::Synthetic {
            bars,
            seed: args.seed,
        };
    } else if args.config.is_none() {
        config.data = DataSource::Instrument {
            code: prompt_instrument()?,
            data_dir: args.data_dir.clone(),
        };
    }

    config.validate()?;
    Ok(config)
}

/// Run, asking for another instrument while the chosen one has no data file.
fn run_with_retry(mut config: BacktestConfig) -> Result<BacktestReport> {
    loop {
        tracing::debug!(
            run_id = %config.run_id(),
            source = %config.data.describe(),
            "starting backtest"
        );
        match run_backtest(&config) {
            Ok(report) => return Ok(report),
            Err(RunError::Data(LoadError::MissingDataFile { path })) => {
                let data_dir = match &config.data {
                    DataSource::Instrument { data_dir, .. } => data_dir.clone(),
                    _ => bail!("data file not found: {}", path.display()),
                };
                eprintln!(
                    "Data file {} not found. Please choose another instrument.",
                    path.display()
                );
                config.data = DataSource::Instrument {
                    code: prompt_instrument()?,
                    data_dir,
                };
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn prompt_instrument() -> Result<String> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("Available instruments:");
        for inst in instruments() {
            println!("  {:<8} {:<5} {}", inst.code, inst.number, inst.name);
        }
        print!("Instrument code: ");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next() else {
            bail!("no instrument selected");
        };
        let line = line.context("failed to read instrument code")?;
        match scorelab_runner::find_instrument(&line) {
            Some(inst) => return Ok(inst.code.to_string()),
            None => eprintln!("Unknown instrument '{}'.", line.trim()),
        }
    }
}

fn run_cmd(
    config: BacktestConfig,
    trades_csv: Option<PathBuf>,
    scores_csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<()> {
    let report = run_with_retry(config.clone())?;

    print!("{}", render_console(&report, config.print_bars));
    println!("Run ID: {}", report.run_id);

    if let Some(path) = trades_csv {
        write_artifact(&path, &report::export_trades_csv(&report.trade_log.trades)?)?;
        println!("Trades written to {}", path.display());
    }
    if let Some(path) = scores_csv {
        write_artifact(&path, &report::export_scores_csv(&report)?)?;
        println!("Scores written to {}", path.display());
    }
    if let Some(path) = json {
        write_artifact(&path, &report::export_json(&report)?)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn sweep_cmd(config: BacktestConfig, from: i32, to: i32) -> Result<()> {
    let thresholds = threshold_range(from, to);
    if thresholds.is_empty() {
        bail!("empty threshold range {from}..={to}");
    }

    let report = run_with_retry(config)?;
    let points = sweep_thresholds(&report.scores, &report.candles, &thresholds);

    println!("Source: {} ({} bars)", report.source, report.bar_count);
    println!(
        "{:>9} {:>11} {:>12} {:>6} {:>7} {:>9}",
        "threshold", "round trips", "total pnl", "wins", "losses", "win rate"
    );
    for p in &points {
        println!(
            "{:>9} {:>11} {:>12.4} {:>6} {:>7} {:>8.2}%",
            p.threshold,
            p.round_trips,
            p.stats.total_pnl,
            p.stats.wins,
            p.stats.losses,
            p.stats.win_rate
        );
    }
    if let Some(best) = best_by_pnl(&points) {
        println!(
            "Best threshold by PnL: {} ({:.4})",
            best.threshold, best.stats.total_pnl
        );
    }

    Ok(())
}

fn list_cmd(data_dir: &Path) {
    println!(
        "{:<8} {:<6} {:<22} {:<9} Description",
        "Code", "No.", "Name", "Data"
    );
    for inst in instruments() {
        let present = if inst.data_file(data_dir).exists() {
            "present"
        } else {
            "missing"
        };
        println!(
            "{:<8} {:<6} {:<22} {:<9} {}",
            inst.code, inst.number, inst.name, present, inst.description
        );
    }
}
