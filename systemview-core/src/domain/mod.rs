//! Domain types for SystemView

pub mod bar;
pub mod series;
pub mod signal;
pub mod trade;

pub use bar::{is_chronological, Bar};
pub use series::AnnotatedSeries;
pub use signal::Signal;
pub use trade::{Trade, TradeMetric};
