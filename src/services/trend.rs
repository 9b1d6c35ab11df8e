//! Trend classification for the latest bar.

use crate::error::EngineError;
use crate::types::{BarSeries, IndicatorRow, TrendClassification, TrendLabel};

/// Classifies the current trend from the last two indicator rows.
///
/// Rules are tried in order and the first match wins:
/// 1. close above the upper band
/// 2. close below the lower band
/// 3. MACD crossover, else MACD above/below signal
/// 4. close above/below both MA and EMA
/// 5. ranging
///
/// A rule whose inputs are absent is skipped.
#[derive(Debug, Clone, Copy)]
pub struct SignalAnalyzer {
    overbought: f64,
    oversold: f64,
}

impl Default for SignalAnalyzer {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

type Rule = (TrendLabel, String);

impl SignalAnalyzer {
    /// Use custom RSI levels for the informational notes.
    pub fn with_rsi_levels(overbought: f64, oversold: f64) -> Self {
        Self {
            overbought,
            oversold,
        }
    }

    /// Classify the latest bar.
    ///
    /// Fails only when the series has no latest close.
    pub fn classify(
        &self,
        series: &BarSeries,
        rows: &[IndicatorRow],
    ) -> Result<TrendClassification, EngineError> {
        let close = series
            .last()
            .ok_or_else(|| EngineError::NoData(format!("no close price for {}", series.symbol())))?
            .close();

        let last = rows.last();
        let prior = rows.len().checked_sub(2).map(|i| &rows[i]);

        let (label, reason) = last
            .and_then(|row| Self::breakout(close, row))
            .or_else(|| last.zip(prior).and_then(|(row, prev)| Self::macd(row, prev)))
            .or_else(|| last.and_then(|row| Self::moving_average(close, row)))
            .unwrap_or_else(|| {
                (
                    TrendLabel::Ranging,
                    "No breakout, crossover or moving-average trend".to_string(),
                )
            });

        let mut explanations = vec![reason];
        if let Some(rsi) = last.and_then(|row| row.rsi) {
            if rsi >= self.overbought {
                explanations.push(format!("RSI {:.1} is overbought", rsi));
            } else if rsi <= self.oversold {
                explanations.push(format!("RSI {:.1} is oversold", rsi));
            }
        }

        Ok(TrendClassification {
            label,
            explanations,
        })
    }

    fn breakout(close: f64, row: &IndicatorRow) -> Option<Rule> {
        if let Some(upper) = row.upper_band {
            if close > upper {
                return Some((
                    TrendLabel::BreakoutUp,
                    format!("Close {:.2} broke above the upper band {:.2}", close, upper),
                ));
            }
        }
        if let Some(lower) = row.lower_band {
            if close < lower {
                return Some((
                    TrendLabel::BreakoutDown,
                    format!("Close {:.2} broke below the lower band {:.2}", close, lower),
                ));
            }
        }
        None
    }

    fn macd(row: &IndicatorRow, prev: &IndicatorRow) -> Option<Rule> {
        let (macd, signal) = (row.macd?, row.signal?);
        let (prev_macd, prev_signal) = (prev.macd?, prev.signal?);

        if prev_macd <= prev_signal && macd > signal {
            Some((
                TrendLabel::GoldenCross,
                format!("MACD {:.4} crossed above signal {:.4}", macd, signal),
            ))
        } else if prev_macd >= prev_signal && macd < signal {
            Some((
                TrendLabel::DeadCross,
                format!("MACD {:.4} crossed below signal {:.4}", macd, signal),
            ))
        } else if macd > signal {
            Some((
                TrendLabel::MacdBullish,
                format!("MACD {:.4} is above signal {:.4}", macd, signal),
            ))
        } else if macd < signal {
            Some((
                TrendLabel::MacdBearish,
                format!("MACD {:.4} is below signal {:.4}", macd, signal),
            ))
        } else {
            None
        }
    }

    fn moving_average(close: f64, row: &IndicatorRow) -> Option<Rule> {
        let (ma, ema) = (row.ma?, row.ema?);

        if close > ma && close > ema {
            Some((
                TrendLabel::Uptrend,
                format!("Close {:.2} is above MA {:.2} and EMA {:.2}", close, ma, ema),
            ))
        } else if close < ma && close < ema {
            Some((
                TrendLabel::Downtrend,
                format!("Close {:.2} is below MA {:.2} and EMA {:.2}", close, ma, ema),
            ))
        } else {
            None
        }
    }
}
