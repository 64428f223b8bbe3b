//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use super::{Indicator, IndicatorError};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidLength);
        }
        Ok(Self {
            period,
            name: format!("sma_{period}"),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, IndicatorError> {
        let n = bars.len();
        if n < self.period {
            return Err(IndicatorError::InsufficientData {
                required: self.period,
                available: n,
            });
        }

        let mut result = vec![f64::NAN; n];

        // Summed per window, newest close first.
        for i in (self.period - 1)..n {
            let sum: f64 = (0..self.period).map(|j| bars[i - j].close).sum();
            result[i] = sum / self.period as f64;
        }

        Ok(result)
    }
}
