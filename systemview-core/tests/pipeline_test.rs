//! End-to-end tests of the core stages: indicator → signals → simulation.

mod common;

use common::bars_from_closes;
use systemview_core::domain::Signal;
use systemview_core::engine::simulate;
use systemview_core::indicators::{Indicator, IndicatorError, Sma};
use systemview_core::signals::{SignalGenerator, TurningPoint};

fn run(closes: &[f64], length: usize) -> (Vec<f64>, Vec<Signal>, systemview_core::engine::SimulationResult) {
    let bars = bars_from_closes(closes);
    let indicator = Sma::new(length).unwrap().compute(&bars).unwrap();
    let signals = TurningPoint::new(length).generate(&indicator);
    let sim = simulate(&bars, &signals);
    (indicator, signals, sim)
}

#[test]
fn two_bar_average_over_symmetric_swing() {
    let closes = [100.0, 105.0, 110.0, 105.0, 100.0, 105.0, 110.0];
    let (indicator, signals, sim) = run(&closes, 2);

    assert!(indicator[0].is_nan());
    assert_eq!(indicator[1], 102.5);
    assert_eq!(indicator[2], 107.5);
    assert_eq!(indicator[3], 107.5);
    assert_eq!(indicator[4], 102.5);

    // The turn at index 2 lies before L + 2 = 4, and the plateaus after it
    // are ties, so nothing fires.
    assert!(signals.iter().all(|s| *s == Signal::None));
    assert!(sim.trades.is_empty());
}

#[test]
fn trough_to_peak_trade_returns_ten_percent() {
    let closes = [120.0, 115.0, 110.0, 101.0, 99.0, 100.0, 105.0, 111.0, 110.0, 100.0];
    let (_, signals, sim) = run(&closes, 1);

    assert_eq!(signals[5], Signal::Buy);
    assert_eq!(signals[8], Signal::Sell);
    assert_eq!(sim.trades.len(), 1);

    let t = &sim.trades[0];
    assert_eq!(t.entry_price, 100.0);
    assert_eq!(t.exit_price, 110.0);
    assert_eq!(t.return_pct, 110.0 / 100.0 - 1.0);
    assert!((t.return_pct - 0.10).abs() < 1e-12);
    assert_eq!(t.holding_days, 3);

    assert_eq!(sim.drawdowns[0].value, 0.0);
    assert!((sim.mae[0].value - (110.0 / 111.0 - 1.0)).abs() < 1e-12);
    assert!((sim.efficiency[0].value - 0.04).abs() < 1e-12);

    // Long over bars 5 → 8, flat afterwards.
    assert_eq!(sim.equity[5], 1.0);
    assert!((sim.equity[8] - 1.10).abs() < 1e-12);
    assert_eq!(sim.equity[9], sim.equity[8]);
}

#[test]
fn flat_series_produces_no_signals() {
    let length = 5;
    let closes = vec![100.0; length + 10];
    let (_, signals, sim) = run(&closes, length);
    assert!(signals.iter().all(|s| *s == Signal::None));
    assert!(sim.trades.is_empty());
    assert!(sim.equity.iter().all(|e| *e == 1.0));
}

#[test]
fn series_shorter_than_window_is_an_error() {
    let bars = bars_from_closes(&[100.0, 101.0]);
    let err = Sma::new(21).unwrap().compute(&bars).unwrap_err();
    assert_eq!(
        err,
        IndicatorError::InsufficientData {
            required: 21,
            available: 2
        }
    );
}

#[test]
fn short_series_yields_empty_result_not_error() {
    // L bars: the indicator computes but no bar reaches L + 2.
    let (_, signals, sim) = run(&[100.0, 90.0, 110.0], 3);
    assert!(signals.iter().all(|s| *s == Signal::None));
    assert!(sim.trades.is_empty());
}

#[test]
fn rerun_is_identical() {
    let closes: Vec<f64> = (0..300)
        .map(|i| 100.0 + (i as f64 * 0.15).sin() * 8.0 + i as f64 * 0.05)
        .collect();
    let (_, s1, r1) = run(&closes, 10);
    let (_, s2, r2) = run(&closes, 10);
    assert_eq!(s1, s2);
    assert_eq!(r1.trades, r2.trades);
    assert_eq!(r1.mae, r2.mae);
    assert_eq!(r1.equity, r2.equity);
    assert!(!r1.trades.is_empty());
}

#[test]
fn repeated_close_plateau_does_not_fire() {
    // close[1] == close[10]: the averages at bars 9 and 10 are equal, so bar 11 is no turn.
    let closes = [
        95.69, 100.31, 95.24, 96.44, 100.93, 97.53, 95.69, 96.0, 96.45, 99.46, 100.31, 100.46,
        97.27,
    ];
    let (indicator, signals, sim) = run(&closes, 9);
    assert_eq!(indicator[9], indicator[10]);
    assert_eq!(signals[11], Signal::None);
    assert!(sim.trades.is_empty());
}
