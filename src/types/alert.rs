use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

/// Minimum absolute percent moves for a dual-condition alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertThresholds {
    pub price_pct: f64,
    pub volume_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            price_pct: 2.0,
            volume_pct: 50.0,
        }
    }
}

impl AlertThresholds {
    /// Both thresholds must be finite and non-negative.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [("price_pct", self.price_pct), ("volume_pct", self.volume_pct)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidSettings(format!(
                    "{} threshold must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Price/volume change between two consecutive observations of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResult {
    pub price_pct_change: f64,
    pub volume_pct_change: f64,
    /// Both moves reached their thresholds.
    pub triggered: bool,
    /// Price and volume moved in opposite directions.
    pub divergence: bool,
}

/// Per-bar change versus the preceding bar, for history tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarMark {
    pub time: i64,
    pub close: f64,
    pub volume: f64,
    /// Absent on the first bar.
    pub price_pct_change: Option<f64>,
    /// Absent on the first bar.
    pub volume_pct_change: Option<f64>,
    pub anomaly: bool,
}

/// Payload handed to the notification transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNotification {
    pub id: Uuid,
    pub symbol: String,
    pub price_pct_change: f64,
    pub volume_pct_change: f64,
    pub divergence: bool,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl AlertNotification {
    pub fn new(symbol: &str, alert: &AlertResult) -> Self {
        let mut message = format!(
            "{} unusual move: price {:.2}%, volume {:.2}%",
            symbol, alert.price_pct_change, alert.volume_pct_change
        );
        if alert.divergence {
            message.push_str(" (price/volume divergence)");
        }

        Self {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            price_pct_change: alert.price_pct_change,
            volume_pct_change: alert.volume_pct_change,
            divergence: alert.divergence,
            message,
            created_at: Utc::now(),
        }
    }
}
