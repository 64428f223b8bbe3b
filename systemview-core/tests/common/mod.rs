//! Shared helpers for core integration tests.

use chrono::{Duration, NaiveDate};
use systemview_core::domain::Bar;

/// Daily bars from close prices, one calendar day apart starting 1960-01-04.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(1960, 1, 4).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1_000_000,
        })
        .collect()
}
