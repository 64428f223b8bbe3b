//! Bar loading for the runner.
//!
//! Reads a daily OHLCV CSV file into a chronologically ordered bar series:
//! 1. Locate the `date, open, high, low, close, volume` columns by header
//!    name (case-insensitive; other columns are ignored)
//! 2. Reverse the rows if the file is newest-first
//! 3. Require strictly increasing dates and positive prices
//! 4. Apply the optional inclusive start/end date range
//!
//! Missing trading days are accepted as-is. A seeded random walk is
//! available as a synthetic stand-in when no file is supplied.

use chrono::{Datelike, NaiveDate};
use std::io::Read;
use std::path::{Path, PathBuf};
use systemview_core::domain::Bar;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV header is missing the '{0}' column")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse {field} from '{value}'")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("bar dated {date} has a non-positive price")]
    InvalidPrice { date: NaiveDate },

    #[error("dates are not strictly increasing (first offending date {date})")]
    NotChronological { date: NaiveDate },

    #[error("no bars left to analyze")]
    Empty,
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadOptions {
    /// First date to keep (inclusive).
    pub start: Option<NaiveDate>,
    /// Last date to keep (inclusive).
    pub end: Option<NaiveDate>,
}

impl LoadOptions {
    fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Where a bar series came from.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSource {
    File { path: PathBuf },
    Synthetic { seed: u64 },
}

impl DataSource {
    /// Short name for artifact directories: the file stem, or `synthetic`.
    pub fn label(&self) -> String {
        match self {
            DataSource::File { path } => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "data".to_string()),
            DataSource::Synthetic { .. } => "synthetic".to_string(),
        }
    }
}

/// Result of loading bars, including provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub bars: Vec<Bar>,
    pub source: DataSource,
    /// BLAKE3 over every date and OHLCV value.
    pub dataset_hash: String,
    /// True if the input arrived newest-first and was reversed.
    pub reversed: bool,
}

/// Load bars from a CSV file on disk.
pub fn load_csv(path: &Path, opts: &LoadOptions) -> Result<LoadedData, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (bars, reversed) = parse_csv(file, opts)?;
    info!(
        path = %path.display(),
        bars = bars.len(),
        first = %bars[0].date,
        last = %bars[bars.len() - 1].date,
        "loaded bars"
    );
    Ok(LoadedData {
        dataset_hash: compute_dataset_hash(&bars),
        bars,
        source: DataSource::File {
            path: path.to_path_buf(),
        },
        reversed,
    })
}

/// Parse CSV from any reader. Returns the ordered bars and whether they were reversed.
///
/// The returned series is never empty.
pub fn parse_csv<R: Read>(reader: R, opts: &LoadOptions) -> Result<(Vec<Bar>, bool), LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(LoadError::MissingColumn(name))
    };
    let cols = Columns {
        date: column("date")?,
        open: column("open")?,
        high: column("high")?,
        low: column("low")?,
        close: column("close")?,
        volume: column("volume")?,
    };

    let mut bars = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1.
        bars.push(cols.parse(&record, i + 2)?);
    }

    let reversed = bars.len() >= 2 && bars[0].date > bars[1].date;
    if reversed {
        debug!("input is newest-first; reversing");
        bars.reverse();
    }

    if let Some(w) = bars.windows(2).find(|w| w[0].date >= w[1].date) {
        return Err(LoadError::NotChronological { date: w[1].date });
    }

    bars.retain(|b| opts.contains(b.date));
    if bars.is_empty() {
        return Err(LoadError::Empty);
    }

    for bar in &bars {
        if !(bar.open > 0.0 && bar.high > 0.0 && bar.low > 0.0 && bar.close > 0.0) {
            return Err(LoadError::InvalidPrice { date: bar.date });
        }
        if !bar.is_sane() {
            warn!(date = %bar.date, "bar OHLC range is inconsistent; kept as-is");
        }
    }

    Ok((bars, reversed))
}

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn parse(&self, record: &csv::StringRecord, row: usize) -> Result<Bar, LoadError> {
        let field = |idx: usize, name: &'static str| {
            record.get(idx).ok_or_else(|| LoadError::Parse {
                row,
                field: name,
                value: String::new(),
            })
        };
        let price = |idx: usize, name: &'static str| -> Result<f64, LoadError> {
            let raw = field(idx, name)?;
            raw.parse::<f64>().map_err(|_| LoadError::Parse {
                row,
                field: name,
                value: raw.to_string(),
            })
        };

        let raw_date = field(self.date, "date")?;
        let date = parse_date(raw_date).ok_or_else(|| LoadError::Parse {
            row,
            field: "date",
            value: raw_date.to_string(),
        })?;

        let raw_volume = field(self.volume, "volume")?;
        let volume = parse_volume(raw_volume).ok_or_else(|| LoadError::Parse {
            row,
            field: "volume",
            value: raw_volume.to_string(),
        })?;

        Ok(Bar {
            date,
            open: price(self.open, "open")?,
            high: price(self.high, "high")?,
            low: price(self.low, "low")?,
            close: price(self.close, "close")?,
            volume,
        })
    }
}

/// `YYYY-MM-DD`, or the legacy Yahoo `D-Mon-YY` form.
///
/// Two-digit years above 20 are 19xx, the rest 20xx.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    let mut parts = raw.split('-');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || year.len() != 2 {
        return None;
    }
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month))? as u32
        + 1;
    let yy: i32 = year.parse().ok()?;
    let year = if yy > 20 { 1900 + yy } else { 2000 + yy };
    NaiveDate::from_ymd_opt(year, month, day.parse().ok()?)
}

/// Volume as an integer; whole-valued decimals such as `"1200.0"` are accepted.
fn parse_volume(raw: &str) -> Option<u64> {
    if let Ok(v) = raw.parse::<u64>() {
        return Some(v);
    }
    let v = raw.parse::<f64>().ok()?;
    (v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64).then_some(v as u64)
}

/// Compute a deterministic BLAKE3 hash over all bar data.
pub fn compute_dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

pub const DEFAULT_SYNTHETIC_SEED: u64 = 42;

/// Generate a seeded random-walk series of weekday bars.
///
/// Starts at 100.0 and runs from `start` through `end` inclusive.
/// These are clearly fake and tagged as synthetic.
pub fn generate_synthetic(seed: u64, start: NaiveDate, end: NaiveDate) -> LoadedData {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        // Skip weekends (simple heuristic)
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.02..0.021);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(Bar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    warn!(seed, bars = bars.len(), "using synthetic bars; results are not market data");
    LoadedData {
        dataset_hash: compute_dataset_hash(&bars),
        bars,
        source: DataSource::Synthetic { seed },
        reversed: false,
    }
}
