//! Text report and chart-ready derived views.
//!
//! Everything here reads an `Analysis` or `Summary`; nothing recomputes a
//! statistic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use systemview_core::domain::{AnnotatedSeries, Signal};

use crate::metrics::Summary;
use crate::runner::Analysis;

/// The summary table.
pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(&format!("There were {} trades.\n", summary.trade_count));
    out.push_str(&format!("There were {} winners.\n", summary.win_count));
    out.push_str(&format!("There were {} losers.\n", summary.loss_count));
    out.push_str(&format!("Winning % =      {:.2}%\n", summary.win_pct * 100.0));
    out.push_str(&format!("Average win =    {:.2}%\n", summary.avg_win * 100.0));
    out.push_str(&format!("Average loss =   {:.2}%\n", -summary.avg_loss * 100.0));
    out.push_str(&format!("Profit factor =  {:.2}\n", summary.profit_factor));
    out.push_str(&format!("Expectancy =     {:.2}\n", summary.expectancy));
    out.push_str(&format!("Total gain =     {:.2}%\n", summary.total_gain * 100.0));
    out.push_str(&format!("Annual gain =    {:.2}%\n", summary.annual_gain * 100.0));
    out.push_str(&format!("Regret =         {:.2}%\n", summary.regret * 100.0));
    out
}

/// First/last record and first/last trade, for verbose output.
pub fn render_details(analysis: &Analysis) -> String {
    let mut out = String::new();
    let bars = &analysis.series.bars;
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        out.push_str(&format!("First record {}, {:.2}\n", first.date, first.close));
        out.push_str(&format!("Last record  {}, {:.2}\n", last.date, last.close));
    }
    if let (Some(first), Some(last)) = (analysis.trades.first(), analysis.trades.last()) {
        out.push_str(&format!(
            "First trade {}, {:.2}%\n",
            first.entry_date,
            first.return_pct * 100.0
        ));
        out.push_str(&format!(
            "Last trade  {}, {:.2}%\n",
            last.entry_date,
            last.return_pct * 100.0
        ));
    }
    if let Some(bar) = analysis.unmatched_entry.and_then(|idx| bars.get(idx)) {
        out.push_str(&format!("Open position from {} not counted\n", bar.date));
    }
    out
}

/// Where a chart should draw a buy or sell marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMarker {
    pub index: usize,
    pub date: NaiveDate,
    pub signal: Signal,
    /// Price anchor: below the close for buys, above it for sells.
    pub anchor: f64,
}

/// Markers for every Buy and Sell, offset from the close by `distance` (fractional).
pub fn signal_markers(series: &AnnotatedSeries, distance: f64) -> Vec<SignalMarker> {
    series
        .bars
        .iter()
        .zip(&series.signals)
        .enumerate()
        .filter_map(|(index, (bar, signal))| {
            let anchor = match signal {
                Signal::Buy => bar.close / (1.0 + distance),
                Signal::Sell => bar.close * (1.0 + distance),
                Signal::None => return None,
            };
            Some(SignalMarker {
                index,
                date: bar.date,
                signal: *signal,
                anchor,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::analyze;
    use chrono::Duration;
    use systemview_core::domain::Bar;

    fn summary() -> Summary {
        Summary {
            trade_count: 4,
            win_count: 3,
            loss_count: 1,
            win_pct: 0.75,
            avg_win: 0.04,
            avg_loss: 0.02,
            profit_factor: 2.0,
            expectancy: 1.25,
            total_gain: 0.1012,
            annual_gain: 0.0498,
            regret: 0.4,
        }
    }

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(1960, 1, 4).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                date: base + Duration::days(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1,
            })
            .collect()
    }

    #[test]
    fn summary_table_lines() {
        let text = render_summary(&summary());
        assert!(text.contains("There were 4 trades."));
        assert!(text.contains("Winning % =      75.00%"));
        assert!(text.contains("Average loss =   -2.00%"));
        assert!(text.contains("Profit factor =  2.00"));
        assert!(text.contains("Regret =         40.00%"));
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn markers_sit_outside_price() {
        let closes = [120.0, 115.0, 110.0, 101.0, 99.0, 100.0, 105.0, 111.0, 110.0, 100.0];
        let a = analyze(bars(&closes), 1).unwrap();
        let markers = signal_markers(&a.series, 0.2);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].signal, Signal::Buy);
        assert!((markers[0].anchor - 100.0 / 1.2).abs() < 1e-12);
        assert_eq!(markers[1].signal, Signal::Sell);
        assert!((markers[1].anchor - 110.0 * 1.2).abs() < 1e-12);
    }

    #[test]
    fn details_name_first_and_last() {
        let closes = [120.0, 115.0, 110.0, 101.0, 99.0, 100.0, 105.0, 111.0, 110.0, 100.0];
        let a = analyze(bars(&closes), 1).unwrap();
        let text = render_details(&a);
        assert!(text.contains("First record 1960-01-04, 120.00"));
        assert!(text.contains("First trade 1960-01-09, 10.00%"));
    }
}
