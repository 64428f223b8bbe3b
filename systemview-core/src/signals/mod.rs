//! Signal generation from a precomputed indicator series.
//!
//! Signals depend only on the indicator column. They never see positions or
//! equity; the trade simulator owns that state.

pub mod turning_point;

pub use turning_point::TurningPoint;

use crate::domain::Signal;

/// Generates one signal per bar from an indicator series.
///
/// # Invariants
/// - Output length equals `indicator.len()`.
/// - Bars before `warmup_bars()` are always `Signal::None`.
/// - Deterministic for the same input.
pub trait SignalGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// First bar index on which a signal may fire.
    fn warmup_bars(&self) -> usize;

    /// Signal at a single bar, or `Signal::None`.
    fn evaluate(&self, indicator: &[f64], bar_index: usize) -> Signal;

    /// Evaluate every bar in the series.
    fn generate(&self, indicator: &[f64]) -> Vec<Signal> {
        (0..indicator.len())
            .map(|i| {
                if i < self.warmup_bars() {
                    Signal::None
                } else {
                    self.evaluate(indicator, i)
                }
            })
            .collect()
    }
}
