//! Export: JSON and CSV artifacts for charting and archival.
//!
//! The JSON artifact carries a `schema_version`; unknown versions are
//! rejected on load. CSV files hold one chart layer each so a plotting tool
//! never has to recompute anything.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use systemview_core::domain::{AnnotatedSeries, Trade, TradeMetric};

use crate::config::ReportConfig;
use crate::distribution::{return_distribution, ReturnDistribution};
use crate::metrics::Summary;
use crate::report::signal_markers;
use crate::runner::{Analysis, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `Analysis` to pretty JSON.
pub fn export_json(analysis: &Analysis) -> Result<String> {
    serde_json::to_string_pretty(analysis).context("failed to serialize Analysis to JSON")
}

/// Deserialize an `Analysis` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<Analysis> {
    let analysis: Analysis =
        serde_json::from_str(json).context("failed to deserialize Analysis from JSON")?;
    if analysis.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            analysis.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(analysis)
}

pub fn export_summary_json(summary: &Summary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize Summary to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: entry_index, entry_date, entry_price, exit_index, exit_date,
/// exit_price, return_pct, holding_days
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "entry_index",
        "entry_date",
        "entry_price",
        "exit_index",
        "exit_date",
        "exit_price",
        "return_pct",
        "holding_days",
    ])?;
    for t in trades {
        wtr.write_record([
            &t.entry_index.to_string(),
            &t.entry_date.to_string(),
            &format!("{:.6}", t.entry_price),
            &t.exit_index.to_string(),
            &t.exit_date.to_string(),
            &format!("{:.6}", t.exit_price),
            &format!("{:.6}", t.return_pct),
            &t.holding_days.to_string(),
        ])?;
    }
    finish(wtr)
}

/// One row per bar. The indicator column is empty during warm-up.
pub fn export_series_csv(series: &AnnotatedSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "close",
        "indicator",
        "signal",
        "equity",
        "days_in_drawdown",
    ])?;
    for row in series.rows() {
        let indicator = if row.indicator.is_nan() {
            String::new()
        } else {
            format!("{:.6}", row.indicator)
        };
        wtr.write_record([
            &row.bar.date.to_string(),
            &format!("{:.6}", row.bar.close),
            &indicator,
            row.signal.as_str(),
            &format!("{:.6}", row.equity),
            &row.days_in_drawdown.to_string(),
        ])?;
    }
    finish(wtr)
}

/// The four per-trade lists side by side, keyed by entry date.
pub fn export_trade_metrics_csv(
    drawdowns: &[TradeMetric],
    mae: &[TradeMetric],
    efficiency: &[TradeMetric],
    volatility: &[TradeMetric],
) -> Result<String> {
    let n = drawdowns.len();
    if mae.len() != n || efficiency.len() != n || volatility.len() != n {
        bail!(
            "per-trade lists differ in length: drawdown {}, mae {}, efficiency {}, volatility {}",
            n,
            mae.len(),
            efficiency.len(),
            volatility.len()
        );
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["entry_date", "drawdown", "mae", "efficiency", "volatility"])?;
    for i in 0..n {
        wtr.write_record([
            &drawdowns[i].entry_date.to_string(),
            &format!("{:.6}", drawdowns[i].value),
            &format!("{:.6}", mae[i].value),
            &format!("{:.6}", efficiency[i].value),
            &format!("{:.6}", volatility[i].value),
        ])?;
    }
    finish(wtr)
}

pub fn export_markers_csv(series: &AnnotatedSeries, distance: f64) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["index", "date", "signal", "anchor"])?;
    for m in signal_markers(series, distance) {
        wtr.write_record([
            &m.index.to_string(),
            &m.date.to_string(),
            m.signal.as_str(),
            &format!("{:.6}", m.anchor),
        ])?;
    }
    finish(wtr)
}

pub fn export_distribution_csv(dist: &ReturnDistribution) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["lower", "upper", "non_negative", "negative"])?;
    for b in &dist.bins {
        wtr.write_record([
            &format!("{:.6}", b.lower),
            &format!("{:.6}", b.upper),
            &b.non_negative.to_string(),
            &b.negative.to_string(),
        ])?;
    }
    finish(wtr)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one analysis.
///
/// Creates `{label}_{timestamp}/` under `output_dir` containing
/// `analysis.json`, `trades.csv`, `series.csv`, `trade_metrics.csv`,
/// `markers.csv`, plus `summary.json` when a summary exists and
/// `distribution.csv` when there are trades.
///
/// Returns the path to the created directory.
pub fn save_artifacts(
    analysis: &Analysis,
    summary: Option<&Summary>,
    report: &ReportConfig,
    label: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let dirname = format!("{}_{}", label, chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    write(&run_dir, "analysis.json", &export_json(analysis)?)?;
    if let Some(summary) = summary {
        write(&run_dir, "summary.json", &export_summary_json(summary)?)?;
    }
    write(&run_dir, "trades.csv", &export_trades_csv(&analysis.trades)?)?;
    write(&run_dir, "series.csv", &export_series_csv(&analysis.series)?)?;
    write(
        &run_dir,
        "trade_metrics.csv",
        &export_trade_metrics_csv(
            &analysis.drawdowns,
            &analysis.mae,
            &analysis.efficiency,
            &analysis.volatility,
        )?,
    )?;
    write(
        &run_dir,
        "markers.csv",
        &export_markers_csv(&analysis.series, report.marker_distance)?,
    )?;
    if let Some(dist) = return_distribution(&analysis.trades, report.distribution_bin_width) {
        write(&run_dir, "distribution.csv", &export_distribution_csv(&dist)?)?;
    }

    Ok(run_dir)
}

fn write(dir: &Path, name: &str, contents: &str) -> Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Load an `Analysis` from an artifact directory's analysis.json.
pub fn load_artifacts(dir: &Path) -> Result<Analysis> {
    let path = dir.join("analysis.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
