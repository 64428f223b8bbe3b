//! Trade: a completed long round trip, plus the per-trade metric records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A matched Buy → Sell pair with its realized return and holding period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    // ── Entry ──
    pub entry_index: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_index: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,

    /// `exit_price / entry_price - 1`.
    pub return_pct: f64,
    /// Bar-index distance from entry to exit.
    pub holding_days: usize,
}

impl Trade {
    /// A return of exactly zero counts as a loss.
    pub fn is_winner(&self) -> bool {
        self.return_pct > 0.0
    }
}

/// One derived value for one trade, keyed by the trade's entry date.
///
/// Drawdown, MAE, efficiency, and in-trade volatility are each stored as a
/// separate list of these, in the same order as the trade list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeMetric {
    pub entry_date: NaiveDate,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade(exit_price: f64) -> Trade {
        Trade {
            entry_index: 5,
            entry_date: NaiveDate::from_ymd_opt(1960, 1, 11).unwrap(),
            entry_price: 100.0,
            exit_index: 9,
            exit_date: NaiveDate::from_ymd_opt(1960, 1, 15).unwrap(),
            exit_price,
            return_pct: exit_price / 100.0 - 1.0,
            holding_days: 4,
        }
    }

    #[test]
    fn is_winner() {
        assert!(sample_trade(110.0).is_winner());
        assert!(!sample_trade(90.0).is_winner());
    }

    #[test]
    fn flat_trade_is_a_loss() {
        assert!(!sample_trade(100.0).is_winner());
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade(110.0);
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
