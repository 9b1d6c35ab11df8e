use serde::{Deserialize, Serialize};

/// Directional bias of a trend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// Trend state for the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    /// Close above the upper Bollinger band.
    BreakoutUp,
    /// Close below the lower Bollinger band.
    BreakoutDown,
    /// MACD crossed above its signal line on the latest bar.
    GoldenCross,
    /// MACD crossed below its signal line on the latest bar.
    DeadCross,
    MacdBullish,
    MacdBearish,
    /// Close above both moving averages.
    Uptrend,
    /// Close below both moving averages.
    Downtrend,
    Ranging,
}

impl TrendLabel {
    /// Get display name for this label.
    pub fn name(&self) -> &'static str {
        match self {
            TrendLabel::BreakoutUp => "Breakout Up",
            TrendLabel::BreakoutDown => "Breakout Down",
            TrendLabel::GoldenCross => "Golden Cross",
            TrendLabel::DeadCross => "Dead Cross",
            TrendLabel::MacdBullish => "MACD Bullish",
            TrendLabel::MacdBearish => "MACD Bearish",
            TrendLabel::Uptrend => "Uptrend",
            TrendLabel::Downtrend => "Downtrend",
            TrendLabel::Ranging => "Ranging",
        }
    }

    pub fn bias(&self) -> Bias {
        match self {
            TrendLabel::BreakoutUp
            | TrendLabel::GoldenCross
            | TrendLabel::MacdBullish
            | TrendLabel::Uptrend => Bias::Bullish,
            TrendLabel::BreakoutDown
            | TrendLabel::DeadCross
            | TrendLabel::MacdBearish
            | TrendLabel::Downtrend => Bias::Bearish,
            TrendLabel::Ranging => Bias::Neutral,
        }
    }
}

/// Trend label plus the human-readable lines explaining it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendClassification {
    pub label: TrendLabel,
    /// First line explains the label; later lines are informational notes.
    pub explanations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serialization() {
        assert_eq!(
            serde_json::to_string(&TrendLabel::GoldenCross).unwrap(),
            "\"golden_cross\""
        );
        let parsed: TrendLabel = serde_json::from_str("\"breakout_down\"").unwrap();
        assert_eq!(parsed, TrendLabel::BreakoutDown);
    }

    #[test]
    fn test_label_bias() {
        assert_eq!(TrendLabel::BreakoutUp.bias(), Bias::Bullish);
        assert_eq!(TrendLabel::DeadCross.bias(), Bias::Bearish);
        assert_eq!(TrendLabel::Ranging.bias(), Bias::Neutral);
        assert_eq!(TrendLabel::MacdBearish.name(), "MACD Bearish");
    }
}
