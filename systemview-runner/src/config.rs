//! Serializable analysis configuration, loaded from TOML.
//!
//! ```toml
//! [data]
//! file = "spx.csv"
//! start = "1960-01-01"
//! end = "1970-01-01"
//!
//! [indicator]
//! length = 21
//!
//! [report]
//! verbose = true
//! marker_distance = 0.2
//! distribution_bin_width = 0.005
//! ```
//!
//! Every section and field is optional; omitted values take the defaults below.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INDICATOR_LENGTH: usize = 21;
pub const DEFAULT_MARKER_DISTANCE: f64 = 0.2;
pub const DEFAULT_BIN_WIDTH: f64 = 0.005;

/// Errors from config loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Input file and optional inclusive date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorConfig {
    /// Moving-average window length in bars.
    #[serde(default = "default_length")]
    pub length: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_INDICATOR_LENGTH,
        }
    }
}

/// Presentation settings. None of these affect the computed statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Also print first/last record and first/last trade.
    #[serde(default)]
    pub verbose: bool,
    /// Fractional distance of signal markers from the close.
    #[serde(default = "default_marker_distance")]
    pub marker_distance: f64,
    /// Bin width of the return distribution.
    #[serde(default = "default_bin_width")]
    pub distribution_bin_width: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            marker_distance: DEFAULT_MARKER_DISTANCE,
            distribution_bin_width: DEFAULT_BIN_WIDTH,
        }
    }
}

fn default_length() -> usize {
    DEFAULT_INDICATOR_LENGTH
}

fn default_marker_distance() -> f64 {
    DEFAULT_MARKER_DISTANCE
}

fn default_bin_width() -> f64 {
    DEFAULT_BIN_WIDTH
}

impl AnalysisConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indicator.length == 0 {
            return Err(ConfigError::Invalid(
                "indicator.length must be at least 1".into(),
            ));
        }
        if !(self.report.marker_distance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "report.marker_distance must be >= 0, got {}",
                self.report.marker_distance
            )));
        }
        if !(self.report.distribution_bin_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "report.distribution_bin_width must be > 0, got {}",
                self.report.distribution_bin_width
            )));
        }
        if let (Some(start), Some(end)) = (self.data.start, self.data.end) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "data.start ({start}) is after data.end ({end})"
                )));
            }
        }
        Ok(())
    }
}
