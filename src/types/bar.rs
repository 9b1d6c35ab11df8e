use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Wire shape of a bar, validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBar {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// One OHLCV sample for a fixed interval.
///
/// All numeric fields are finite and non-negative. `time` is a Unix
/// timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBar", into = "RawBar")]
pub struct Bar {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Bar {
    /// Create a bar, rejecting NaN, infinite or negative prices and volume.
    pub fn new(
        time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, EngineError> {
        for (field, value) in [
            ("open", open),
            ("high", high),
            ("low", low),
            ("close", close),
            ("volume", volume),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidBar(format!(
                    "{} must be finite and non-negative, got {} at {}",
                    field, value, time
                )));
            }
        }

        Ok(Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn open(&self) -> f64 {
        self.open
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn close(&self) -> f64 {
        self.close
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }
}

impl TryFrom<RawBar> for Bar {
    type Error = EngineError;

    fn try_from(raw: RawBar) -> Result<Self, Self::Error> {
        Bar::new(raw.time, raw.open, raw.high, raw.low, raw.close, raw.volume)
    }
}

impl From<Bar> for RawBar {
    fn from(bar: Bar) -> Self {
        RawBar {
            time: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSeries {
    symbol: String,
    bars: Vec<Bar>,
}

/// Time-ordered bars for one symbol.
///
/// Timestamps are strictly increasing. An empty series is valid and means
/// "no data yet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries", into = "RawSeries")]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, rejecting duplicate or decreasing timestamps.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, EngineError> {
        for pair in bars.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(EngineError::OutOfOrder {
                    previous: pair[0].time,
                    current: pair[1].time,
                });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// An empty series for a symbol.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Latest bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Bar before the latest one.
    pub fn previous(&self) -> Option<&Bar> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

impl TryFrom<RawSeries> for BarSeries {
    type Error = EngineError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        BarSeries::new(raw.symbol, raw.bars)
    }
}

impl From<BarSeries> for RawSeries {
    fn from(series: BarSeries) -> Self {
        RawSeries {
            symbol: series.symbol,
            bars: series.bars,
        }
    }
}
