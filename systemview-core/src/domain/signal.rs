//! Per-bar trading directive.

use serde::{Deserialize, Serialize};

/// Signal emitted on a bar by the turning-point detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    #[default]
    None,
    /// Indicator turned up (local minimum).
    Buy,
    /// Indicator turned down (local maximum).
    Sell,
}

impl Signal {
    pub fn is_entry(self) -> bool {
        matches!(self, Signal::Buy)
    }

    pub fn is_exit(self) -> bool {
        matches!(self, Signal::Sell)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::None => "none",
            Signal::Buy => "buy",
            Signal::Sell => "sell",
        }
    }
}
