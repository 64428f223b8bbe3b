//! Trade simulation engine.
//!
//! Runs after signal generation. Three passes over the same bars:
//! trade extraction (with per-trade drawdown), per-trade path metrics, and
//! the equity curve with its time-in-drawdown profile.

pub mod equity;
pub mod excursion;
pub mod simulator;
pub mod trade_extraction;

pub use equity::{equity_curve, time_in_drawdown, DrawdownProfile, INITIAL_EQUITY};
pub use excursion::{
    efficiency, in_trade_volatility, max_adverse_excursion, measure_trades, TradeExcursions,
};
pub use simulator::{simulate, SimulationResult};
pub use trade_extraction::{extract_trades, Extraction};
