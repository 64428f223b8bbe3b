//! Trade extraction: walks the signal column and matches Buy → Sell pairs.
//!
//! Pure function: bars + signals → trades and their price drawdowns.
//! One position at a time; a Buy while long is ignored.

use crate::domain::{Bar, Signal, Trade, TradeMetric};
use tracing::debug;

/// State for the position being tracked during extraction.
#[derive(Debug, Clone, Copy)]
struct OpenTrade {
    entry_index: usize,
    entry_price: f64,
    /// Lowest close strictly below entry seen so far; `None` until price dips under entry.
    lowest_below_entry: Option<f64>,
}

impl OpenTrade {
    fn open(entry_index: usize, entry_price: f64) -> Self {
        Self {
            entry_index,
            entry_price,
            lowest_below_entry: None,
        }
    }

    fn observe(&mut self, close: f64) {
        if close < self.entry_price {
            self.lowest_below_entry = Some(match self.lowest_below_entry {
                Some(low) => low.min(close),
                None => close,
            });
        }
    }

    /// Worst close relative to entry, or 0.0 if price never went below entry.
    fn drawdown(&self) -> f64 {
        match self.lowest_below_entry {
            Some(low) => low / self.entry_price - 1.0,
            None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PositionState {
    Flat,
    Long(OpenTrade),
}

/// Output of trade extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub trades: Vec<Trade>,
    /// Per-trade price drawdown, parallel to `trades`.
    pub drawdowns: Vec<TradeMetric>,
    /// Bar index of a Buy still open when the series ended. Not reported as a trade.
    pub unmatched_entry: Option<usize>,
}

/// Extract round-trip trades from the signal column.
///
/// A Buy opens a position when flat; the next Sell closes it. The trade's
/// drawdown is measured over closes from entry through exit inclusive.
pub fn extract_trades(bars: &[Bar], signals: &[Signal]) -> Extraction {
    let mut out = Extraction::default();
    let mut state = PositionState::Flat;

    for (i, (bar, signal)) in bars.iter().zip(signals).enumerate() {
        state = match state {
            PositionState::Flat => match signal {
                Signal::Buy => PositionState::Long(OpenTrade::open(i, bar.close)),
                Signal::Sell | Signal::None => PositionState::Flat,
            },
            PositionState::Long(mut open) => {
                open.observe(bar.close);
                match signal {
                    Signal::Sell => {
                        let entry_bar = &bars[open.entry_index];
                        out.trades.push(Trade {
                            entry_index: open.entry_index,
                            entry_date: entry_bar.date,
                            entry_price: open.entry_price,
                            exit_index: i,
                            exit_date: bar.date,
                            exit_price: bar.close,
                            return_pct: bar.close / open.entry_price - 1.0,
                            holding_days: i - open.entry_index,
                        });
                        out.drawdowns.push(TradeMetric {
                            entry_date: entry_bar.date,
                            value: open.drawdown(),
                        });
                        PositionState::Flat
                    }
                    Signal::Buy | Signal::None => PositionState::Long(open),
                }
            }
        };
    }

    if let PositionState::Long(open) = state {
        debug!(
            entry_index = open.entry_index,
            "discarding Buy with no matching Sell before end of series"
        );
        out.unmatched_entry = Some(open.entry_index);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal::{Buy, None as N, Sell};
    use crate::indicators::make_bars;

    #[test]
    fn single_round_trip() {
        let bars = make_bars(&[100.0, 95.0, 105.0, 110.0]);
        let signals = [Buy, N, N, Sell];
        let ex = extract_trades(&bars, &signals);

        assert_eq!(ex.trades.len(), 1);
        let t = &ex.trades[0];
        assert_eq!(t.entry_index, 0);
        assert_eq!(t.exit_index, 3);
        assert_eq!(t.holding_days, 3);
        assert_eq!(t.return_pct, 110.0 / 100.0 - 1.0);
        assert_eq!(t.entry_date, bars[0].date);
        assert_eq!(t.exit_date, bars[3].date);
        assert_eq!(ex.drawdowns[0].value, 95.0 / 100.0 - 1.0);
        assert_eq!(ex.unmatched_entry, None);
    }

    #[test]
    fn drawdown_uses_lowest_close() {
        let bars = make_bars(&[100.0, 90.0, 95.0, 80.0, 98.0, 120.0]);
        let signals = [Buy, N, N, N, N, Sell];
        let ex = extract_trades(&bars, &signals);
        assert_eq!(ex.drawdowns[0].value, 80.0 / 100.0 - 1.0);
    }

    #[test]
    fn no_dip_means_zero_drawdown() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let ex = extract_trades(&bars, &[Buy, N, Sell]);
        assert_eq!(ex.drawdowns[0].value, 0.0);
    }

    #[test]
    fn buy_while_long_is_ignored() {
        let bars = make_bars(&[100.0, 90.0, 95.0, 120.0, 110.0, 130.0]);
        let signals = [Buy, N, Buy, Sell, Buy, Sell];
        let ex = extract_trades(&bars, &signals);
        assert_eq!(ex.trades.len(), 2);
        assert_eq!(ex.trades[0].entry_index, 0);
        assert_eq!(ex.trades[0].exit_index, 3);
        assert_eq!(ex.trades[1].entry_index, 4);
        assert_eq!(ex.trades[1].exit_index, 5);
    }

    #[test]
    fn sell_while_flat_is_ignored() {
        let bars = make_bars(&[100.0, 90.0, 95.0]);
        let ex = extract_trades(&bars, &[Sell, Buy, Sell]);
        assert_eq!(ex.trades.len(), 1);
        assert_eq!(ex.trades[0].entry_index, 1);
    }

    #[test]
    fn trailing_buy_is_dropped() {
        let bars = make_bars(&[100.0, 110.0, 105.0, 120.0]);
        let ex = extract_trades(&bars, &[Buy, Sell, Buy, N]);
        assert_eq!(ex.trades.len(), 1);
        assert_eq!(ex.drawdowns.len(), 1);
        assert_eq!(ex.unmatched_entry, Some(2));
    }

    #[test]
    fn flat_exit_is_recorded() {
        let bars = make_bars(&[100.0, 99.0, 100.0]);
        let ex = extract_trades(&bars, &[Buy, N, Sell]);
        assert_eq!(ex.trades[0].return_pct, 0.0);
        assert!(!ex.trades[0].is_winner());
    }
}
