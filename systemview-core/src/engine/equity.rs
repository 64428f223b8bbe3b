//! Equity curve and time in drawdown.
//!
//! The curve compounds one unit of capital while long and stays flat while
//! out of the market. It is driven by the signal column directly, independent
//! of the trade list.

use crate::domain::{Bar, Signal};

/// Starting value of the equity index.
pub const INITIAL_EQUITY: f64 = 1.0;

/// Compound the value of one unit through the signal column.
///
/// The signal on bar `i` decides whether the move from `i` to `i + 1` is held.
pub fn equity_curve(bars: &[Bar], signals: &[Signal]) -> Vec<f64> {
    if bars.is_empty() {
        return Vec::new();
    }

    let mut equity = Vec::with_capacity(bars.len());
    equity.push(INITIAL_EQUITY);

    let mut in_position = false;
    for i in 0..bars.len() - 1 {
        match signals.get(i).copied().unwrap_or_default() {
            Signal::Buy => in_position = true,
            Signal::Sell => in_position = false,
            Signal::None => {}
        }
        let prev = equity[i];
        let next = if in_position {
            prev * (bars[i + 1].close / bars[i].close)
        } else {
            prev
        };
        equity.push(next);
    }
    equity
}

/// Consecutive bars below the running equity peak, and the share of time spent there.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownProfile {
    pub days_in_drawdown: Vec<usize>,
    /// Fraction of bars after the first that sit below the running peak, in `[0, 1]`.
    pub regret: f64,
}

/// Count time under water for each bar.
///
/// The peak starts at zero and is only updated from bar 1 onward. A series
/// of one bar has no elapsed time and a regret of 0.0.
pub fn time_in_drawdown(equity: &[f64]) -> DrawdownProfile {
    let mut days = vec![0usize; equity.len()];
    let mut maximum = 0.0_f64;
    let mut under_water = 0usize;

    for i in 1..equity.len() {
        if equity[i] < maximum {
            days[i] = days[i - 1] + 1;
            under_water += 1;
        } else {
            maximum = equity[i];
        }
    }

    let elapsed = equity.len().saturating_sub(1);
    let regret = if elapsed == 0 {
        0.0
    } else {
        under_water as f64 / elapsed as f64
    };

    DrawdownProfile {
        days_in_drawdown: days,
        regret,
    }
}
