use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AlertResult, BarMark, IndicatorRow, TrendClassification};

/// An alert result tagged with its symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedAlert {
    pub symbol: String,
    #[serde(flatten)]
    pub alert: AlertResult,
}

/// Cross-sectional view over per-symbol alert results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    /// Sorted by volume change descending, ties by symbol ascending.
    pub by_volume: Vec<RankedAlert>,
    /// Entries of `by_volume` with a price/volume divergence, same order.
    pub divergent: Vec<RankedAlert>,
    /// Entries of `by_volume` that triggered, same order.
    pub triggered: Vec<RankedAlert>,
}

/// Everything derived for one symbol in one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolReport {
    pub symbol: String,
    pub last_close: f64,
    pub last_time: i64,
    pub bar_count: usize,
    pub trend: TrendClassification,
    pub alert: AlertResult,
    /// Trailing indicator rows, oldest first.
    pub recent_rows: Vec<IndicatorRow>,
    /// Trailing per-bar change marks, oldest first.
    pub recent_marks: Vec<BarMark>,
}

/// Outcome for one symbol in a refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SymbolStatus {
    Ready(SymbolReport),
    Failed { symbol: String, error: String },
}

impl SymbolStatus {
    pub fn symbol(&self) -> &str {
        match self {
            SymbolStatus::Ready(report) => &report.symbol,
            SymbolStatus::Failed { symbol, .. } => symbol,
        }
    }

    pub fn report(&self) -> Option<&SymbolReport> {
        match self {
            SymbolStatus::Ready(report) => Some(report),
            SymbolStatus::Failed { .. } => None,
        }
    }
}

/// Immutable result of one monitor refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    /// `None` until the first refresh has completed.
    pub generated_at: Option<DateTime<Utc>>,
    pub period: String,
    pub interval: String,
    pub symbols: Vec<SymbolStatus>,
    pub ranking: Ranking,
}

impl MonitorSnapshot {
    /// Find a symbol's status, ignoring case.
    pub fn status(&self, symbol: &str) -> Option<&SymbolStatus> {
        self.symbols
            .iter()
            .find(|s| s.symbol().eq_ignore_ascii_case(symbol))
    }

    pub fn failed_count(&self) -> usize {
        self.symbols
            .iter()
            .filter(|s| matches!(s, SymbolStatus::Failed { .. }))
            .count()
    }
}
