//! Market-data sources that hand bar series to the engine.

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use std::future::Future;

use crate::error::Result;
use crate::types::BarSeries;

/// Lookback periods accepted by the monitor.
pub const PERIOD_OPTIONS: &[&str] = &["1d", "5d", "1mo", "3mo", "6mo", "1y"];

/// Bar intervals accepted by the monitor.
pub const INTERVAL_OPTIONS: &[&str] = &["1m", "5m", "15m", "1h", "1d"];

/// Bars for one symbol plus what the source knows about the prior session.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedBars {
    pub series: BarSeries,
    /// Close of the previous trading session, if the source reports one.
    pub previous_close: Option<f64>,
}

/// A supplier of time-ordered bars.
pub trait BarSource: Send + Sync {
    fn fetch_bars(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> impl Future<Output = Result<FetchedBars>> + Send;
}
