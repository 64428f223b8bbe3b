//! Analysis runner: wires loading, indicator, signals, simulation, and summary.
//!
//! Two entry points:
//! - `analyze()`: takes an ordered bar series and runs every core stage. No I/O.
//! - `run_from_config()`: loads bars as the config describes, then analyzes and
//!   summarizes. Used by the CLI and integration tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use systemview_core::domain::{AnnotatedSeries, Bar, Trade, TradeMetric};
use systemview_core::engine::simulate;
use systemview_core::indicators::{Indicator, IndicatorError, Sma};
use systemview_core::signals::{SignalGenerator, TurningPoint};

use crate::config::{AnalysisConfig, ConfigError};
use crate::data_loader::{load_csv, LoadError, LoadOptions, LoadedData};
use crate::metrics::{Summary, SummaryError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("indicator error: {0}")]
    Indicator(#[from] IndicatorError),
    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),
    #[error("no input: set data.file in the config or pass a CSV path")]
    NoInput,
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything the core computes for one bar series.
///
/// This is the contract toward presentation: charts and reports read these
/// fields and never recompute them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub indicator_name: String,
    pub indicator_length: usize,
    pub series: AnnotatedSeries,
    pub trades: Vec<Trade>,
    pub drawdowns: Vec<TradeMetric>,
    pub mae: Vec<TradeMetric>,
    pub efficiency: Vec<TradeMetric>,
    pub volatility: Vec<TradeMetric>,
    pub regret: f64,
    /// Entry bar of a trailing Buy that never closed. Not counted as a trade.
    pub unmatched_entry: Option<usize>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Analysis {
    /// Summary statistics over this analysis' trades.
    pub fn summarize(&self) -> Result<Summary, SummaryError> {
        Summary::compute(&self.trades, self.regret, &self.series.bars)
    }
}

/// Run the core stages over an ordered bar series.
///
/// Fails only when the series is shorter than the indicator window or the
/// window length is zero. A series too short to produce signals yields an
/// analysis with no trades.
pub fn analyze(bars: Vec<Bar>, indicator_length: usize) -> Result<Analysis, RunError> {
    let sma = Sma::new(indicator_length)?;
    let indicator = sma.compute(&bars)?;
    debug!(indicator = sma.name(), lookback = sma.lookback(), "indicator computed");

    let generator = TurningPoint::new(indicator_length);
    let signals = generator.generate(&indicator);
    debug!(
        generator = generator.name(),
        warmup = generator.warmup_bars(),
        "signals generated"
    );

    let sim = simulate(&bars, &signals);
    info!(
        bars = bars.len(),
        trades = sim.trades.len(),
        regret = sim.regret,
        "simulation complete"
    );

    Ok(Analysis {
        schema_version: SCHEMA_VERSION,
        indicator_name: sma.name().to_string(),
        indicator_length,
        series: AnnotatedSeries {
            bars,
            indicator,
            signals,
            equity: sim.equity,
            days_in_drawdown: sim.days_in_drawdown,
        },
        trades: sim.trades,
        drawdowns: sim.drawdowns,
        mae: sim.mae,
        efficiency: sim.efficiency,
        volatility: sim.volatility,
        regret: sim.regret,
        unmatched_entry: sim.unmatched_entry,
    })
}

/// Complete result of a config-driven run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub data: LoadedData,
    pub analysis: Analysis,
    pub summary: Summary,
}

/// Load bars for the configured file and date range.
pub fn load_configured(config: &AnalysisConfig) -> Result<LoadedData, RunError> {
    config.validate()?;
    let path = config.data.file.as_deref().ok_or(RunError::NoInput)?;
    let opts = LoadOptions {
        start: config.data.start,
        end: config.data.end,
    };
    Ok(load_csv(path, &opts)?)
}

/// Load, analyze, and summarize as the config describes.
pub fn run_from_config(config: &AnalysisConfig) -> Result<RunOutput, RunError> {
    let data = load_configured(config)?;
    let analysis = analyze(data.bars.clone(), config.indicator.length)?;
    let summary = analysis.summarize()?;
    Ok(RunOutput {
        data,
        analysis,
        summary,
    })
}
