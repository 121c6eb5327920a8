use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Trailing lookback window for a history request.
///
/// The system only ever asks for two windows: the shortest supported lookback
/// as a validation probe, and the full five-year analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRange {
    OneDay,
    FiveYears,
}

impl HistoryRange {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveYears => "5y",
        }
    }
}

impl Display for HistoryRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
