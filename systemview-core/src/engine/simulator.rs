//! Trade simulator: runs every post-signal pass and bundles the results.
//!
//! The bundle owns the trade list, the parallel per-trade metric lists, and
//! the equity/drawdown columns. It is handed to the summary aggregator as a
//! whole; nothing downstream writes back into it.

use serde::{Deserialize, Serialize};

use super::equity::{equity_curve, time_in_drawdown};
use super::excursion::measure_trades;
use super::trade_extraction::extract_trades;
use crate::domain::{Bar, Signal, Trade, TradeMetric};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub trades: Vec<Trade>,
    pub drawdowns: Vec<TradeMetric>,
    pub mae: Vec<TradeMetric>,
    pub efficiency: Vec<TradeMetric>,
    pub volatility: Vec<TradeMetric>,
    pub equity: Vec<f64>,
    pub days_in_drawdown: Vec<usize>,
    pub regret: f64,
    /// Entry bar of a trailing Buy that never closed; it produces no trade.
    pub unmatched_entry: Option<usize>,
}

/// Simulate the long/flat strategy described by `signals` over `bars`.
///
/// Never fails: a series too short to carry signals simply yields no trades.
pub fn simulate(bars: &[Bar], signals: &[Signal]) -> SimulationResult {
    let extraction = extract_trades(bars, signals);
    let excursions = measure_trades(bars, &extraction.trades);
    let equity = equity_curve(bars, signals);
    let profile = time_in_drawdown(&equity);

    SimulationResult {
        trades: extraction.trades,
        drawdowns: extraction.drawdowns,
        mae: excursions.mae,
        efficiency: excursions.efficiency,
        volatility: excursions.volatility,
        equity,
        days_in_drawdown: profile.days_in_drawdown,
        regret: profile.regret,
        unmatched_entry: extraction.unmatched_entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal::{Buy, None as N, Sell};
    use crate::indicators::make_bars;

    #[test]
    fn every_list_is_parallel_to_trades() {
        let bars = make_bars(&[100.0, 95.0, 110.0, 105.0, 100.0, 90.0, 99.0, 101.0]);
        let signals = [N, Buy, Sell, N, Buy, N, Sell, Buy];
        let r = simulate(&bars, &signals);

        assert_eq!(r.trades.len(), 2);
        assert_eq!(r.drawdowns.len(), 2);
        assert_eq!(r.mae.len(), 2);
        assert_eq!(r.efficiency.len(), 2);
        assert_eq!(r.volatility.len(), 2);
        assert_eq!(r.equity.len(), bars.len());
        assert_eq!(r.days_in_drawdown.len(), bars.len());
        assert_eq!(r.unmatched_entry, Some(7));
    }

    #[test]
    fn no_signals_no_trades() {
        let bars = make_bars(&[100.0; 5]);
        let r = simulate(&bars, &[N; 5]);
        assert!(r.trades.is_empty());
        assert_eq!(r.equity, vec![1.0; 5]);
        assert_eq!(r.regret, 0.0);
    }
}
