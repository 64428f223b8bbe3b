//! SystemView Runner: loading, configuration, summary statistics, and export.
//!
//! This crate builds on `systemview-core` to provide:
//! - CSV bar loading with date filtering and a synthetic fallback
//! - TOML analysis config
//! - The pipeline driver (`analyze`, `run_from_config`)
//! - Summary statistics with explicit errors for undefined values
//! - Return distribution, signal markers, and the text report
//! - JSON/CSV artifact export

pub mod config;
pub mod data_loader;
pub mod distribution;
pub mod export;
pub mod metrics;
pub mod report;
pub mod runner;

pub use config::{AnalysisConfig, ConfigError};
pub use data_loader::{
    generate_synthetic, load_csv, DataSource, LoadError, LoadOptions, LoadedData,
};
pub use distribution::{return_distribution, HistogramBin, ReturnDistribution};
pub use export::{load_artifacts, save_artifacts};
pub use metrics::{Summary, SummaryError};
pub use report::{render_details, render_summary, signal_markers, SignalMarker};
pub use runner::{analyze, load_configured, run_from_config, Analysis, RunError, RunOutput};
