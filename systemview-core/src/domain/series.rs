//! Annotated bar series: the bars plus every per-bar derived column.
//!
//! Each stage produces its own column; the pipeline driver assembles them
//! here. All columns are indexed identically to `bars`.

use serde::{Deserialize, Serialize};

use super::{Bar, Signal};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedSeries {
    pub bars: Vec<Bar>,
    /// Moving average; NaN during the warm-up window (`null` when serialized).
    #[serde(with = "nan_as_null")]
    pub indicator: Vec<f64>,
    pub signals: Vec<Signal>,
    /// Compounding strategy index, starts at 1.0.
    pub equity: Vec<f64>,
    /// Consecutive bars spent below the running equity peak.
    pub days_in_drawdown: Vec<usize>,
}

/// Borrowed view of one annotated bar.
#[derive(Debug, Clone, Copy)]
pub struct SeriesRow<'a> {
    pub bar: &'a Bar,
    pub indicator: f64,
    pub signal: Signal,
    pub equity: f64,
    pub days_in_drawdown: usize,
}

impl AnnotatedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Indicator value at `index`, or `None` during warm-up / out of range.
    pub fn indicator_at(&self, index: usize) -> Option<f64> {
        self.indicator.get(index).copied().filter(|v| !v.is_nan())
    }

    pub fn row(&self, index: usize) -> Option<SeriesRow<'_>> {
        Some(SeriesRow {
            bar: self.bars.get(index)?,
            indicator: *self.indicator.get(index)?,
            signal: *self.signals.get(index)?,
            equity: *self.equity.get(index)?,
            days_in_drawdown: *self.days_in_drawdown.get(index)?,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = SeriesRow<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// Indices of bars carrying the given signal.
    pub fn signal_indices(&self, signal: Signal) -> Vec<usize> {
        self.signals
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == signal)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn final_equity(&self) -> Option<f64> {
        self.equity.last().copied()
    }
}

/// Warm-up NaNs round-trip through formats without NaN (JSON) as nulls.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(values.iter().map(|v| if v.is_nan() { None } else { Some(*v) }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        let values: Vec<Option<f64>> = Vec::deserialize(d)?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn sample_series() -> AnnotatedSeries {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        AnnotatedSeries {
            bars,
            indicator: vec![f64::NAN, 10.5, 11.5],
            signals: vec![Signal::None, Signal::Buy, Signal::Sell],
            equity: vec![1.0, 1.0, 12.0 / 11.0],
            days_in_drawdown: vec![0, 0, 0],
        }
    }

    #[test]
    fn indicator_at_hides_warmup() {
        let s = sample_series();
        assert_eq!(s.indicator_at(0), None);
        assert_eq!(s.indicator_at(1), Some(10.5));
        assert_eq!(s.indicator_at(3), None);
    }

    #[test]
    fn rows_cover_every_bar() {
        let s = sample_series();
        assert_eq!(s.rows().count(), 3);
        let row = s.row(1).unwrap();
        assert_eq!(row.signal, Signal::Buy);
        assert_eq!(row.bar.close, 11.0);
    }

    #[test]
    fn warmup_nan_survives_json() {
        let s = sample_series();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"indicator\":[null,10.5,11.5]"));
        let back: AnnotatedSeries = serde_json::from_str(&json).unwrap();
        assert!(back.indicator[0].is_nan());
        assert_eq!(back.indicator[1..], s.indicator[1..]);
    }

    #[test]
    fn signal_indices_by_kind() {
        let s = sample_series();
        assert_eq!(s.signal_indices(Signal::Buy), vec![1]);
        assert_eq!(s.signal_indices(Signal::Sell), vec![2]);
    }
}
