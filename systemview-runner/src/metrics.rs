//! Summary statistics: pure functions over the trade list and equity state.
//!
//! Every statistic that can be undefined (no trades, no losing trades, no
//! elapsed time) returns an explicit error instead of 0, infinity, or NaN.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use systemview_core::domain::{Bar, Trade};
use thiserror::Error;

/// Days per calendar year used to turn a date span into fractional years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Errors from summary aggregation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    #[error("no completed trades: win rate, profit factor, and expectancy are undefined")]
    NoTrades,

    #[error("{statistic} is undefined: {reason}")]
    DegenerateStatistic {
        statistic: &'static str,
        reason: &'static str,
    },
}

/// Aggregate performance statistics for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub win_pct: f64,
    /// Mean return of winning trades; 0.0 with no winners.
    pub avg_win: f64,
    /// Mean magnitude of losing-trade returns (non-negative).
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub expectancy: f64,
    pub total_gain: f64,
    pub annual_gain: f64,
    /// Fraction of elapsed bars spent below the running equity peak.
    pub regret: f64,
}

impl Summary {
    /// Reduce the trade list and equity regret to summary statistics.
    ///
    /// `bars` is the series the trades came from; its dates bound the
    /// annualization span.
    pub fn compute(trades: &[Trade], regret: f64, bars: &[Bar]) -> Result<Self, SummaryError> {
        let (wins, losses) = split_returns(trades);

        let win_pct = win_pct(trades)?;
        let avg_win = average_win(&wins);
        let avg_loss = average_loss(&losses);
        let profit_factor = profit_factor(avg_win, avg_loss)?;
        let total_gain = total_gain(trades);
        let years = years_spanned(bars)?;

        Ok(Self {
            trade_count: trades.len(),
            win_count: wins.len(),
            loss_count: losses.len(),
            win_pct,
            avg_win,
            avg_loss,
            profit_factor,
            expectancy: expectancy(win_pct, profit_factor),
            total_gain,
            annual_gain: annual_gain(total_gain, years)?,
            regret,
        })
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Partition trade returns into wins (`> 0`) and losses (`<= 0`).
pub fn split_returns(trades: &[Trade]) -> (Vec<f64>, Vec<f64>) {
    trades
        .iter()
        .map(|t| t.return_pct)
        .partition(|r| *r > 0.0)
}

/// Fraction of trades that were winners.
pub fn win_pct(trades: &[Trade]) -> Result<f64, SummaryError> {
    if trades.is_empty() {
        return Err(SummaryError::NoTrades);
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    Ok(winners as f64 / trades.len() as f64)
}

/// Mean winning return, 0.0 when there are no winners.
pub fn average_win(wins: &[f64]) -> f64 {
    if wins.is_empty() {
        return 0.0;
    }
    wins.iter().sum::<f64>() / wins.len() as f64
}

/// Mean losing return as a magnitude, 0.0 when there are no losers.
pub fn average_loss(losses: &[f64]) -> f64 {
    if losses.is_empty() {
        return 0.0;
    }
    (losses.iter().sum::<f64>() / losses.len() as f64).abs()
}

/// Average win over average loss.
pub fn profit_factor(avg_win: f64, avg_loss: f64) -> Result<f64, SummaryError> {
    if avg_loss == 0.0 {
        return Err(SummaryError::DegenerateStatistic {
            statistic: "profit factor",
            reason: "average loss is zero (no losing trades, or only break-even losses)",
        });
    }
    Ok(avg_win / avg_loss)
}

/// Expected outcome per unit risked: `win_pct * profit_factor - (1 - win_pct)`.
pub fn expectancy(win_pct: f64, profit_factor: f64) -> f64 {
    win_pct * profit_factor - (1.0 - win_pct)
}

/// Geometric compounding of every trade return.
pub fn total_gain(trades: &[Trade]) -> f64 {
    trades.iter().fold(1.0, |acc, t| acc * (1.0 + t.return_pct)) - 1.0
}

/// Fractional calendar years between two dates.
pub fn years_between(first: NaiveDate, last: NaiveDate) -> f64 {
    (last - first).num_days() as f64 / DAYS_PER_YEAR
}

/// Elapsed years from bar 1 to the last bar. Bar 0 never carries a signal.
pub fn years_spanned(bars: &[Bar]) -> Result<f64, SummaryError> {
    match (bars.get(1), bars.last()) {
        (Some(first), Some(last)) => Ok(years_between(first.date, last.date)),
        _ => Err(SummaryError::DegenerateStatistic {
            statistic: "annual gain",
            reason: "series has fewer than two bars",
        }),
    }
}

/// Annualized compound gain over `years`.
pub fn annual_gain(total_gain: f64, years: f64) -> Result<f64, SummaryError> {
    if !(years > 0.0) {
        return Err(SummaryError::DegenerateStatistic {
            statistic: "annual gain",
            reason: "elapsed time is zero",
        });
    }
    Ok((1.0 + total_gain).powf(1.0 / years) - 1.0)
}
