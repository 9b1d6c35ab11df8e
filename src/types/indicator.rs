use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Window and span parameters for the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSettings {
    /// Simple moving average window.
    pub ma_window: usize,
    /// Exponential moving average span.
    pub ema_span: usize,
    /// MACD fast EMA span.
    pub macd_fast: usize,
    /// MACD slow EMA span. Also the MACD/Signal availability gate.
    pub macd_slow: usize,
    /// Span of the signal line EMA.
    pub macd_signal: usize,
    /// RSI averaging window.
    pub rsi_window: usize,
    /// Bollinger standard deviation window.
    pub boll_window: usize,
    /// Bollinger band width in standard deviations.
    pub boll_k: f64,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            ma_window: 20,
            ema_span: 20,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_window: 14,
            boll_window: 20,
            boll_k: 2.0,
        }
    }
}

impl IndicatorSettings {
    /// Check that every window is usable.
    pub fn validate(&self) -> Result<(), EngineError> {
        let windows = [
            ("ma_window", self.ma_window),
            ("ema_span", self.ema_span),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("rsi_window", self.rsi_window),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(EngineError::InvalidSettings(format!("{} must be at least 1", name)));
            }
        }
        // Sample standard deviation needs two points.
        if self.boll_window < 2 {
            return Err(EngineError::InvalidSettings(
                "boll_window must be at least 2".to_string(),
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(EngineError::InvalidSettings(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if !self.boll_k.is_finite() || self.boll_k < 0.0 {
            return Err(EngineError::InvalidSettings(format!(
                "boll_k must be finite and non-negative, got {}",
                self.boll_k
            )));
        }
        Ok(())
    }
}

/// Derived indicator values for one bar.
///
/// `None` means the indicator is not yet computable at this bar. It is never
/// a stand-in for zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorRow {
    pub time: i64,
    pub close: f64,
    pub ma: Option<f64>,
    pub ema: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub rsi: Option<f64>,
}

impl IndicatorRow {
    /// MACD minus its signal line.
    pub fn macd_histogram(&self) -> Option<f64> {
        Some(self.macd? - self.signal?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = IndicatorSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.macd_slow, 26);
        assert_eq!(settings.boll_k, 2.0);
    }

    #[test]
    fn test_invalid_settings() {
        let zero_ma = IndicatorSettings {
            ma_window: 0,
            ..Default::default()
        };
        assert!(zero_ma.validate().is_err());

        let inverted_macd = IndicatorSettings {
            macd_fast: 26,
            macd_slow: 12,
            ..Default::default()
        };
        assert!(inverted_macd.validate().is_err());

        let bad_k = IndicatorSettings {
            boll_k: f64::NAN,
            ..Default::default()
        };
        assert!(bad_k.validate().is_err());

        let tiny_boll = IndicatorSettings {
            boll_window: 1,
            ..Default::default()
        };
        assert!(tiny_boll.validate().is_err());
    }

    #[test]
    fn test_macd_histogram() {
        let mut row = IndicatorRow {
            time: 0,
            close: 10.0,
            ma: None,
            ema: Some(10.0),
            macd: Some(1.5),
            signal: Some(1.0),
            upper_band: None,
            lower_band: None,
            rsi: None,
        };
        assert_eq!(row.macd_histogram(), Some(0.5));
        row.signal = None;
        assert_eq!(row.macd_histogram(), None);
    }

    #[test]
    fn test_absent_serializes_as_null() {
        let row = IndicatorRow {
            time: 0,
            close: 10.0,
            ma: None,
            ema: Some(10.0),
            macd: None,
            signal: None,
            upper_band: None,
            lower_band: None,
            rsi: None,
        };
        let json = serde_json::to_value(row).unwrap();
        assert!(json["ma"].is_null());
        assert_eq!(json["ema"], 10.0);
        assert!(json.get("upperBand").is_some());
    }
}
