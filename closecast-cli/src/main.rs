//! CloseCast CLI — same-day closing-price prediction from daily bars.
//!
//! Commands:
//! - `predict`: train on history and predict the last bar's close
//! - `features`: dump the feature matrix for inspection
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use closecast_core::features::build;
use closecast_core::{Bar, FeatureSet};
use closecast_runner::{
    features_to_csv, BarSource, CsvBarSource, PredictorConfig, StrategyRunner, SyntheticBarSource,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "closecast",
    about = "CloseCast CLI — predict today's close from today's open and lagged indicators"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on every bar before the last and predict the last bar's close.
    Predict {
        #[command(flatten)]
        input: InputArgs,

        /// Live open to use for the evaluation day instead of its recorded open.
        #[arg(long)]
        open: Option<f64>,

        /// Print the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build the feature matrix and write it as CSV.
    Features {
        #[command(flatten)]
        input: InputArgs,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// CSV file with date,open,high,low,close[,volume] columns.
    #[arg(long, conflicts_with = "synthetic")]
    data: Option<PathBuf>,

    /// Generate deterministic synthetic bars for this symbol.
    #[arg(long)]
    synthetic: Option<String>,

    /// Number of synthetic trading days.
    #[arg(long, default_value_t = 250)]
    days: usize,

    /// First synthetic date (YYYY-MM-DD).
    #[arg(long, default_value = "2020-01-01")]
    start: String,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Feature preset: minimal, standard, extended.
    #[arg(long)]
    preset: Option<String>,

    /// Lookback period for ATR and RSI.
    #[arg(long)]
    lookback: Option<usize>,

    /// Short period for SMA and EMA.
    #[arg(long)]
    short: Option<usize>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict { input, open, json } => run_predict(&input, open, json),
        Commands::Features { input, out } => run_features(&input, out.as_deref()),
    }
}

fn run_predict(input: &InputArgs, open: Option<f64>, json: bool) -> Result<()> {
    let config = resolve_config(input)?;
    let bars = load_bars(input)?;

    let report = StrategyRunner::new(config)
        .run(&bars, open)
        .context("prediction failed")?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn run_features(input: &InputArgs, out: Option<&Path>) -> Result<()> {
    let config = resolve_config(input)?;
    let bars = load_bars(input)?;

    let matrix = build(&bars, &config.features)?;
    if matrix.is_empty() {
        bail!(
            "no feature rows: {} bars with lookback {}",
            bars.len(),
            config.features.lookback_period
        );
    }
    let csv = features_to_csv(&matrix, config.features.feature_set, &bars)?;

    match out {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("write features to {}", path.display()))?;
            println!("Wrote {} rows to {}", matrix.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

/// Config file (or defaults), then command-line overrides, then validation.
fn resolve_config(input: &InputArgs) -> Result<PredictorConfig> {
    let mut config = match &input.config {
        Some(path) => PredictorConfig::from_file(path)?,
        None => PredictorConfig::default(),
    };

    if let Some(name) = &input.preset {
        config.features.feature_set = FeatureSet::from_name(name).with_context(|| {
            let known: Vec<&str> = FeatureSet::all().iter().map(|s| s.name()).collect();
            format!("unknown preset '{name}' (expected one of: {})", known.join(", "))
        })?;
    }
    if let Some(lookback) = input.lookback {
        config.features.lookback_period = lookback;
    }
    if let Some(short) = input.short {
        config.features.short_period = short;
    }

    config.validate()?;
    Ok(config)
}

fn load_bars(input: &InputArgs) -> Result<Vec<Bar>> {
    let source: Box<dyn BarSource> = match (&input.data, &input.synthetic) {
        (Some(path), None) => Box::new(CsvBarSource::new(path)),
        (None, Some(symbol)) => {
            let start = NaiveDate::parse_from_str(&input.start, "%Y-%m-%d")
                .with_context(|| format!("invalid --start '{}'", input.start))?;
            Box::new(SyntheticBarSource::new(symbol, start, input.days))
        }
        _ => bail!("one of --data or --synthetic is required"),
    };

    let bars = source
        .fetch()
        .with_context(|| format!("load bars from {}", source.name()))?;
    tracing::info!(source = source.name(), bars = bars.len(), "loaded bars");
    Ok(bars)
}
