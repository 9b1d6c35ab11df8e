//! Yahoo Finance chart API client.
//!
//! Provides OHLCV bars for stocks and ETFs over a lookback period at a
//! fixed interval. Uses the unofficial chart endpoint (no API key).

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{BarSource, FetchedBars};
use crate::error::{AppError, Result};
use crate::types::{Bar, BarSeries};

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    symbol: String,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Normalize symbol for Yahoo Finance API.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.to_uppercase().replace('.', "-")
}

/// Turn a chart response into a validated series.
///
/// Rows without a close are skipped. Missing open/high/low fall back to the
/// close and missing volume to zero. Rows that do not advance the timestamp
/// are dropped.
fn parse_chart(symbol: &str, response: YahooChartResponse) -> Result<FetchedBars> {
    if let Some(error) = response.chart.error {
        return Err(AppError::ExternalApi(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| AppError::ExternalApi(format!("No results for {}", symbol)))?;

    let previous_close = result.meta.previous_close.or(result.meta.chart_previous_close);
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next();

    let (opens, highs, lows, closes, volumes) = match quote {
        Some(q) => (
            q.open.unwrap_or_default(),
            q.high.unwrap_or_default(),
            q.low.unwrap_or_default(),
            q.close.unwrap_or_default(),
            q.volume.unwrap_or_default(),
        ),
        None => Default::default(),
    };

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };
        let open = opens.get(i).copied().flatten().unwrap_or(close);
        let high = highs.get(i).copied().flatten().unwrap_or(close);
        let low = lows.get(i).copied().flatten().unwrap_or(close);
        let volume = volumes.get(i).copied().flatten().unwrap_or(0) as f64;
        let time = timestamp * 1000;

        if bars.last().is_some_and(|last| last.time() >= time) {
            debug!("Dropping non-increasing bar at {} for {}", time, symbol);
            continue;
        }

        match Bar::new(time, open, high, low, close, volume) {
            Ok(bar) => bars.push(bar),
            Err(e) => debug!("Skipping bar for {}: {}", symbol, e),
        }
    }

    Ok(FetchedBars {
        series: BarSeries::new(result.meta.symbol, bars)?,
        previous_close,
    })
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new() -> Result<Self> {
        Self::with_base_url("https://query1.finance.yahoo.com")
    }

    /// Point the client at another host serving the same chart API.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch bars for a symbol.
    ///
    /// Arguments:
    /// - symbol: Stock/ETF symbol (e.g., "AAPL", "SPY")
    /// - range: Time range ("1d", "5d", "1mo", "3mo", "6mo", "1y")
    /// - interval: Bar interval ("1m", "5m", "15m", "1h", "1d")
    pub async fn get_chart(&self, symbol: &str, range: &str, interval: &str) -> Result<FetchedBars> {
        let yahoo_symbol = normalize_yahoo_symbol(symbol);
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            self.base_url, yahoo_symbol, range, interval
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API error for {}: {}",
                yahoo_symbol,
                response.status()
            )));
        }

        let data: YahooChartResponse = response.json().await?;
        parse_chart(&yahoo_symbol, data)
    }
}

impl BarSource for YahooFinanceClient {
    async fn fetch_bars(&self, symbol: &str, period: &str, interval: &str) -> Result<FetchedBars> {
        self.get_chart(symbol, period, interval).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<FetchedBars> {
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        parse_chart("AAPL", response)
    }

    #[test]
    fn test_normalize_yahoo_symbol() {
        assert_eq!(normalize_yahoo_symbol("aapl"), "AAPL");
        assert_eq!(normalize_yahoo_symbol("BRK.B"), "BRK-B");
        assert_eq!(normalize_yahoo_symbol("BRK-B"), "BRK-B");
    }

    #[test]
    fn test_parse_chart() {
        let fetched = parse(
            r#"{"chart": {"result": [{
                "meta": {"symbol": "AAPL", "previousClose": 150.0},
                "timestamp": [1700000000, 1700000300, 1700000600],
                "indicators": {"quote": [{
                    "open": [150.0, 151.0, 152.0],
                    "high": [155.0, 156.0, 157.0],
                    "low": [148.0, 149.0, 150.0],
                    "close": [153.0, 154.0, 155.0],
                    "volume": [50000000, 51000000, 52000000]
                }]}
            }], "error": null}}"#,
        )
        .unwrap();

        assert_eq!(fetched.series.symbol(), "AAPL");
        assert_eq!(fetched.series.len(), 3);
        assert_eq!(fetched.previous_close, Some(150.0));
        let first = fetched.series.bars()[0];
        assert_eq!(first.time(), 1700000000000);
        assert_eq!(first.close(), 153.0);
        assert_eq!(first.volume(), 50000000.0);
    }

    #[test]
    fn test_parse_chart_skips_missing_close() {
        let fetched = parse(
            r#"{"chart": {"result": [{
                "meta": {"symbol": "AAPL", "chartPreviousClose": 149.0},
                "timestamp": [1, 2, 3],
                "indicators": {"quote": [{
                    "close": [153.0, null, 155.0],
                    "volume": [10, null, 30]
                }]}
            }], "error": null}}"#,
        )
        .unwrap();

        assert_eq!(fetched.series.closes(), vec![153.0, 155.0]);
        assert_eq!(fetched.previous_close, Some(149.0));
        // Missing open falls back to close.
        assert_eq!(fetched.series.bars()[0].open(), 153.0);
    }

    #[test]
    fn test_parse_chart_drops_repeated_timestamp() {
        let fetched = parse(
            r#"{"chart": {"result": [{
                "meta": {"symbol": "AAPL"},
                "timestamp": [1, 2, 2],
                "indicators": {"quote": [{"close": [1.0, 2.0, 2.5]}]}
            }], "error": null}}"#,
        )
        .unwrap();

        assert_eq!(fetched.series.closes(), vec![1.0, 2.0]);
        assert_eq!(fetched.series.bars()[1].volume(), 0.0);
    }

    #[test]
    fn test_parse_chart_without_timestamps_is_empty() {
        let fetched = parse(
            r#"{"chart": {"result": [{
                "meta": {"symbol": "AAPL"},
                "indicators": {"quote": []}
            }], "error": null}}"#,
        )
        .unwrap();
        assert!(fetched.series.is_empty());
        assert!(fetched.previous_close.is_none());
    }

    #[test]
    fn test_parse_chart_error() {
        let err = parse(
            r#"{"chart": {"result": null, "error": {
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_client_creation() {
        assert!(YahooFinanceClient::new().is_ok());
    }
}
