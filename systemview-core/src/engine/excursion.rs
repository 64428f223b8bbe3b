//! Per-trade path metrics: maximum adverse excursion, efficiency, and
//! in-trade volatility.
//!
//! Each metric is an independent scan of the closes from entry through exit
//! inclusive. Trades are measured in parallel; output order follows the trade
//! list.

use rayon::prelude::*;

use crate::domain::{Bar, Trade, TradeMetric};

/// Path metrics for every trade, each list parallel to the trade list.
#[derive(Debug, Clone, Default)]
pub struct TradeExcursions {
    pub mae: Vec<TradeMetric>,
    pub efficiency: Vec<TradeMetric>,
    pub volatility: Vec<TradeMetric>,
}

/// Maximum adverse excursion: the deepest fall from the running peak close
/// since entry, as a non-positive fraction.
pub fn max_adverse_excursion(window: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut mae = 0.0_f64;
    for &close in window {
        if close > peak {
            peak = close;
        } else {
            mae = mae.min(close / peak - 1.0);
        }
    }
    mae
}

/// Path length traveled per bar, relative to the entry price.
///
/// `Σ |close[k] - close[k-1]| / (holding_days * entry)`. Zero for a window
/// shorter than two closes.
pub fn efficiency(window: &[f64]) -> f64 {
    let holding_days = window.len().saturating_sub(1);
    if holding_days == 0 {
        return 0.0;
    }
    let distance: f64 = window.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    distance / holding_days as f64 / window[0]
}

/// Mean absolute single-bar return while in the position.
pub fn in_trade_volatility(window: &[f64]) -> f64 {
    let count = window.len().saturating_sub(1);
    if count == 0 {
        return 0.0;
    }
    let total: f64 = window.windows(2).map(|w| (w[1] / w[0] - 1.0).abs()).sum();
    total / count as f64
}

/// Measure all path metrics for each trade.
pub fn measure_trades(bars: &[Bar], trades: &[Trade]) -> TradeExcursions {
    let measured: Vec<(TradeMetric, TradeMetric, TradeMetric)> = trades
        .par_iter()
        .map(|t| {
            let window: Vec<f64> = bars[t.entry_index..=t.exit_index]
                .iter()
                .map(|b| b.close)
                .collect();
            let keyed = |value| TradeMetric {
                entry_date: t.entry_date,
                value,
            };
            (
                keyed(max_adverse_excursion(&window)),
                keyed(efficiency(&window)),
                keyed(in_trade_volatility(&window)),
            )
        })
        .collect();

    let mut out = TradeExcursions {
        mae: Vec::with_capacity(measured.len()),
        efficiency: Vec::with_capacity(measured.len()),
        volatility: Vec::with_capacity(measured.len()),
    };
    for (mae, eff, vol) in measured {
        out.mae.push(mae);
        out.efficiency.push(eff);
        out.volatility.push(vol);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal;
    use crate::engine::trade_extraction::extract_trades;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn mae_tracks_fall_from_running_peak() {
        // Peak 120, trough 90 after it: 90/120 - 1 = -0.25
        let window = [100.0, 120.0, 110.0, 90.0, 130.0];
        assert_approx(max_adverse_excursion(&window), -0.25, DEFAULT_EPSILON);
    }

    #[test]
    fn mae_measures_dip_below_entry() {
        let window = [100.0, 95.0, 105.0];
        assert_approx(max_adverse_excursion(&window), -0.05, DEFAULT_EPSILON);
    }

    #[test]
    fn mae_zero_for_monotonic_rise() {
        assert_eq!(max_adverse_excursion(&[100.0, 101.0, 102.0]), 0.0);
    }

    #[test]
    fn efficiency_is_distance_per_day_over_entry() {
        // |110-100| + |105-110| + |120-105| = 30; 30 / 3 / 100 = 0.1
        let window = [100.0, 110.0, 105.0, 120.0];
        assert_approx(efficiency(&window), 0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn volatility_is_mean_absolute_return() {
        // |0.1| + |-0.1| = 0.2; / 2 = 0.1
        let window = [100.0, 110.0, 99.0];
        assert_approx(in_trade_volatility(&window), 0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn degenerate_windows_are_zero() {
        assert_eq!(efficiency(&[100.0]), 0.0);
        assert_eq!(in_trade_volatility(&[100.0]), 0.0);
        assert_eq!(max_adverse_excursion(&[]), 0.0);
    }

    #[test]
    fn measured_lists_follow_trade_order() {
        let bars = make_bars(&[100.0, 90.0, 110.0, 100.0, 105.0, 95.0, 120.0]);
        let signals = [
            Signal::Buy,
            Signal::None,
            Signal::Sell,
            Signal::Buy,
            Signal::None,
            Signal::None,
            Signal::Sell,
        ];
        let ex = extract_trades(&bars, &signals);
        let m = measure_trades(&bars, &ex.trades);

        assert_eq!(m.mae.len(), 2);
        assert_eq!(m.efficiency.len(), 2);
        assert_eq!(m.volatility.len(), 2);
        for (i, t) in ex.trades.iter().enumerate() {
            assert_eq!(m.mae[i].entry_date, t.entry_date);
            assert_eq!(m.efficiency[i].entry_date, t.entry_date);
            assert_eq!(m.volatility[i].entry_date, t.entry_date);
        }
        assert_approx(m.mae[0].value, -0.1, DEFAULT_EPSILON);
        // (10 + 20) / 2 / 100
        assert_approx(m.efficiency[0].value, 0.15, DEFAULT_EPSILON);
    }
}
