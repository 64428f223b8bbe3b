//! Histogram of trade returns.
//!
//! Bins start at the smallest return and are `bin_width` wide. Each bin keeps
//! non-negative and negative returns apart so a chart can colour them.

use serde::{Deserialize, Serialize};
use systemview_core::domain::Trade;
use tracing::warn;

/// Upper bound on histogram bins; finer widths yield no distribution.
pub const MAX_BINS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    /// Returns `>= 0` falling in this bin.
    pub non_negative: usize,
    /// Returns `< 0` falling in this bin.
    pub negative: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnDistribution {
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
}

impl ReturnDistribution {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.non_negative + b.negative).sum()
    }
}

/// Bin the trade returns.
///
/// `None` when there are no trades, the width is not positive, or the width
/// would need more than [`MAX_BINS`] bins to cover the returns.
pub fn return_distribution(trades: &[Trade], bin_width: f64) -> Option<ReturnDistribution> {
    if trades.is_empty() || !(bin_width > 0.0) {
        return None;
    }

    let min = trades.iter().map(|t| t.return_pct).fold(f64::INFINITY, f64::min);
    let max = trades.iter().map(|t| t.return_pct).fold(f64::NEG_INFINITY, f64::max);
    let steps = ((max - min) / bin_width).floor();
    if !(steps < MAX_BINS as f64) {
        warn!(
            bin_width,
            max_bins = MAX_BINS,
            "bin width too fine for the return range; skipping distribution"
        );
        return None;
    }
    let count = steps as usize + 1;

    let mut bins: Vec<HistogramBin> = (0..count)
        .map(|i| HistogramBin {
            lower: min + i as f64 * bin_width,
            upper: min + (i + 1) as f64 * bin_width,
            non_negative: 0,
            negative: 0,
        })
        .collect();

    for t in trades {
        let idx = (((t.return_pct - min) / bin_width).floor() as usize).min(count - 1);
        if t.return_pct >= 0.0 {
            bins[idx].non_negative += 1;
        } else {
            bins[idx].negative += 1;
        }
    }

    Some(ReturnDistribution { bin_width, bins })
}
