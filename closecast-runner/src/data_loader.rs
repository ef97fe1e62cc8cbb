//! Bar sources for the runner.
//!
//! The prediction core only needs an ordered bar slice. Where the bars come
//! from is a [`BarSource`], constructed once at process start and passed in
//! explicitly:
//! - [`CsvBarSource`]: `date,open,high,low,close[,volume]` files
//! - [`SyntheticBarSource`]: deterministic random walk for demos and tests
//!
//! Source failures surface as [`LoadError`] and abort the run. Nothing here
//! retries.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use closecast_core::Bar;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("no bars in {source_name}")]
    Empty { source_name: String },
    #[error("duplicate bar for {date}")]
    DuplicateDate { date: NaiveDate },
    #[error("bar on {date} fails OHLC sanity checks")]
    InvalidBar { date: NaiveDate },
}

/// A supplier of one symbol's daily bars, oldest first.
pub trait BarSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the full bar sequence, sorted oldest → newest.
    fn fetch(&self) -> Result<Vec<Bar>, LoadError>;
}

// ── CSV ──────────────────────────────────────────────────────────────

/// One CSV record. Header names match case-insensitively for the usual
/// spreadsheet exports (`Date`, `Open`, …); `volume` may be absent or blank.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "DATE")]
    date: NaiveDate,
    #[serde(alias = "Open", alias = "OPEN")]
    open: f64,
    #[serde(alias = "High", alias = "HIGH")]
    high: f64,
    #[serde(alias = "Low", alias = "LOW")]
    low: f64,
    #[serde(alias = "Close", alias = "CLOSE")]
    close: f64,
    #[serde(default, alias = "Volume", alias = "VOLUME")]
    volume: Option<f64>,
}

impl From<CsvRecord> for Bar {
    fn from(r: CsvRecord) -> Self {
        Bar {
            date: r.date,
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
        }
    }
}

/// Bars from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvBarSource {
    path: PathBuf,
    name: String,
}

impl CsvBarSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("csv:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BarSource for CsvBarSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Vec<Bar>, LoadError> {
        let file = std::fs::File::open(&self.path).map_err(|source| LoadError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let bars = parse_csv(file, &self.name)?;
        tracing::debug!(source = %self.name, bars = bars.len(), "loaded bars");
        Ok(bars)
    }
}

/// Parse bars from any CSV reader, then sort and validate them.
pub fn parse_csv<R: Read>(reader: R, source_name: &str) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut bars = Vec::new();
    for record in rdr.deserialize::<CsvRecord>() {
        bars.push(Bar::from(record?));
    }
    normalize(bars, source_name)
}

/// Sort by date and reject empty input, duplicate dates and insane bars.
pub fn normalize(mut bars: Vec<Bar>, source_name: &str) -> Result<Vec<Bar>, LoadError> {
    if bars.is_empty() {
        return Err(LoadError::Empty {
            source_name: source_name.to_string(),
        });
    }
    bars.sort_by_key(|b| b.date);
    if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(LoadError::DuplicateDate { date: pair[1].date });
    }
    if let Some(bad) = bars.iter().find(|b| !b.is_sane()) {
        return Err(LoadError::InvalidBar { date: bad.date });
    }
    Ok(bars)
}

// ── Synthetic ────────────────────────────────────────────────────────

/// Deterministic random-walk bars, seeded from the symbol name.
///
/// These are clearly fake; results on them only exercise the pipeline.
#[derive(Debug, Clone)]
pub struct SyntheticBarSource {
    symbol: String,
    start: NaiveDate,
    days: usize,
    name: String,
}

impl SyntheticBarSource {
    /// `days` trading days (weekends skipped) starting at `start`.
    pub fn new(symbol: impl Into<String>, start: NaiveDate, days: usize) -> Self {
        let symbol = symbol.into();
        let name = format!("synthetic:{symbol}");
        Self {
            symbol,
            start,
            days,
            name,
        }
    }
}

impl BarSource for SyntheticBarSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Vec<Bar>, LoadError> {
        tracing::warn!(symbol = %self.symbol, days = self.days, "generating synthetic bars");
        let bars = generate_synthetic_bars(&self.symbol, self.start, self.days);
        normalize(bars, &self.name)
    }
}

fn generate_synthetic_bars(symbol: &str, start: NaiveDate, days: usize) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Deterministic seed from symbol name
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::with_capacity(days);
    let mut price = 100.0_f64;
    let mut current = start;

    while bars.len() < days {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        // Overnight gap, then the session's move.
        let open = price * (1.0 + rng.gen_range(-0.005..0.005));
        let close = open * (1.0 + rng.gen_range(-0.02..0.02));
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        bars.push(Bar {
            date: current,
            open,
            high,
            low,
            close,
            volume: Some(volume),
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Date,Open,High,Low,Close,Volume
2024-01-03,101.0,103.0,100.0,102.0,1200
2024-01-02,100.0,102.0,99.0,101.0,1000
2024-01-04,102.0,104.0,101.0,103.5,
";

    #[test]
    fn parses_and_sorts_spreadsheet_headers() {
        let bars = parse_csv(CSV.as_bytes(), "test").unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].volume, Some(1000.0));
        assert_eq!(bars[1].close, 102.0);
        assert_eq!(bars[2].volume, None);
    }

    #[test]
    fn volume_column_is_optional() {
        let csv = "date,open,high,low,close\n2024-01-02,1.0,2.0,0.5,1.5\n";
        let bars = parse_csv(csv.as_bytes(), "test").unwrap();
        assert_eq!(bars[0].volume, None);
    }

    #[test]
    fn rejects_duplicates() {
        let csv = "date,open,high,low,close\n2024-01-02,1,2,0.5,1.5\n2024-01-02,1,2,0.5,1.5\n";
        assert!(matches!(
            parse_csv(csv.as_bytes(), "test"),
            Err(LoadError::DuplicateDate { .. })
        ));
    }

    #[test]
    fn rejects_insane_bar() {
        let csv = "date,open,high,low,close\n2024-01-02,1,0.9,0.5,1.5\n";
        assert!(matches!(
            parse_csv(csv.as_bytes(), "test"),
            Err(LoadError::InvalidBar { .. })
        ));
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(matches!(
            parse_csv("date,open,high,low,close\n".as_bytes(), "test"),
            Err(LoadError::Empty { .. })
        ));
        assert!(matches!(
            parse_csv("date,open,high,low,close\nnot-a-date,1,2,0.5,1.5\n".as_bytes(), "test"),
            Err(LoadError::Csv(_))
        ));
    }

    #[test]
    fn synthetic_is_deterministic_and_skips_weekends() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = SyntheticBarSource::new("SPY", start, 40).fetch().unwrap();
        let b = SyntheticBarSource::new("SPY", start, 40).fetch().unwrap();
        let c = SyntheticBarSource::new("QQQ", start, 40).fetch().unwrap();
        assert_eq!(a.len(), 40);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|bar| bar.date.weekday().number_from_monday() <= 5));
        assert!(a.iter().all(Bar::is_sane));
    }

    #[test]
    fn missing_file_is_io_error() {
        let src = CsvBarSource::new("/nonexistent/bars.csv");
        assert!(matches!(src.fetch(), Err(LoadError::Io { .. })));
        assert_eq!(src.name(), "csv:/nonexistent/bars.csv");
    }
}
