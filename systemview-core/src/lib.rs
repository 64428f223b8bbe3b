//! SystemView Core: bars, indicator, signals, and trade simulation.
//!
//! This crate contains the analytics engine:
//! - Domain types (bars, signals, trades, per-trade metric records)
//! - Simple moving average behind the `Indicator` trait
//! - Turning-point signal generator behind the `SignalGenerator` trait
//! - Trade simulator: trade matching, equity curve, time in drawdown,
//!   drawdown / MAE / efficiency / in-trade volatility per trade
//!
//! Stages run strictly in that order and each returns its own output.

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod signals;
