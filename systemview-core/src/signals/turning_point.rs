//! Turning-point signal: local minima and maxima of a smoothed series.
//!
//! Fires Buy when the indicator turns up (fell, then rose) and Sell when it
//! turns down (rose, then fell). This is a peak/trough detector on one
//! series, not a crossover of two.

use super::SignalGenerator;
use crate::domain::Signal;

/// Turning-point detector for an indicator of window length `length`.
///
/// The first candidate bar is `length + 2`, leaving the warm-up window plus
/// two fully-defined indicator values behind it.
#[derive(Debug, Clone)]
pub struct TurningPoint {
    length: usize,
    name: String,
}

impl TurningPoint {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            name: format!("turning_point_{length}"),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl SignalGenerator for TurningPoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        self.length + 2
    }

    fn evaluate(&self, indicator: &[f64], bar_index: usize) -> Signal {
        if bar_index < 2 || bar_index >= indicator.len() {
            return Signal::None;
        }

        let before = indicator[bar_index - 2];
        let pivot = indicator[bar_index - 1];
        let now = indicator[bar_index];

        // Strict on both sides: equal neighbours never fire. NaN compares false.
        if before > pivot && pivot < now {
            Signal::Buy
        } else if before < pivot && pivot > now {
            Signal::Sell
        } else {
            Signal::None
        }
    }
}
