//! Dual-condition price/volume anomaly alerts.

use tracing::debug;

use crate::error::EngineError;
use crate::types::{AlertResult, AlertThresholds, BarMark, BarSeries};

/// Percent change from `previous` to `current`; 0 when `previous` is 0.
pub fn pct_change(current: f64, previous: f64) -> f64 {
    if previous != 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

fn is_anomaly(price_pct: f64, volume_pct: f64, thresholds: &AlertThresholds) -> bool {
    price_pct.abs() >= thresholds.price_pct && volume_pct.abs() >= thresholds.volume_pct
}

/// Evaluates price and volume deltas between two observations.
pub struct AlertEvaluator;

impl AlertEvaluator {
    /// Compare the current close/volume against the previous pair.
    ///
    /// `triggered` needs both moves at or past their thresholds.
    /// `divergence` needs non-zero moves with opposite signs.
    pub fn evaluate(
        symbol: &str,
        current_close: f64,
        previous_close: f64,
        current_volume: f64,
        previous_volume: f64,
        thresholds: &AlertThresholds,
    ) -> AlertResult {
        let price_pct_change = pct_change(current_close, previous_close);
        let volume_pct_change = pct_change(current_volume, previous_volume);

        let triggered = is_anomaly(price_pct_change, volume_pct_change, thresholds);
        let divergence = price_pct_change != 0.0
            && volume_pct_change != 0.0
            && price_pct_change.signum() != volume_pct_change.signum();

        if triggered {
            debug!(
                "{} anomaly: price {:.2}%, volume {:.2}%",
                symbol, price_pct_change, volume_pct_change
            );
        }

        AlertResult {
            price_pct_change,
            volume_pct_change,
            triggered,
            divergence,
        }
    }

    /// Evaluate the latest bar of a series against the one before it.
    ///
    /// With a single bar the previous values default to the current ones,
    /// giving zero deltas. `baseline_close` replaces the prior bar's close
    /// for the price delta when the data source reports a session close.
    pub fn evaluate_latest(
        series: &BarSeries,
        baseline_close: Option<f64>,
        thresholds: &AlertThresholds,
    ) -> Result<AlertResult, EngineError> {
        let current = series
            .last()
            .ok_or_else(|| EngineError::NoData(format!("no bars for {}", series.symbol())))?;
        let previous = series.previous().unwrap_or(current);
        let previous_close = baseline_close.unwrap_or_else(|| previous.close());

        Ok(Self::evaluate(
            series.symbol(),
            current.close(),
            previous_close,
            current.volume(),
            previous.volume(),
            thresholds,
        ))
    }

    /// Per-bar changes and anomaly flags across the whole series.
    pub fn mark_bars(series: &BarSeries, thresholds: &AlertThresholds) -> Vec<BarMark> {
        let bars = series.bars();

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let changes = i.checked_sub(1).map(|p| {
                    (
                        pct_change(bar.close(), bars[p].close()),
                        pct_change(bar.volume(), bars[p].volume()),
                    )
                });

                BarMark {
                    time: bar.time(),
                    close: bar.close(),
                    volume: bar.volume(),
                    price_pct_change: changes.map(|(p, _)| p),
                    volume_pct_change: changes.map(|(_, v)| v),
                    anomaly: changes.is_some_and(|(p, v)| is_anomaly(p, v, thresholds)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;

    fn thresholds() -> AlertThresholds {
        AlertThresholds {
            price_pct: 2.0,
            volume_pct: 50.0,
        }
    }

    fn series(points: &[(f64, f64)]) -> BarSeries {
        let bars = points
            .iter()
            .enumerate()
            .map(|(i, &(c, v))| Bar::new(i as i64 * 1000, c, c, c, c, v).unwrap())
            .collect();
        BarSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn test_dual_condition_triggers() {
        let result = AlertEvaluator::evaluate("AAPL", 102.0, 100.0, 1500.0, 1000.0, &thresholds());
        assert_eq!(result.price_pct_change, 2.0);
        assert_eq!(result.volume_pct_change, 50.0);
        assert!(result.triggered);
        assert!(!result.divergence);
    }

    #[test]
    fn test_price_alone_does_not_trigger() {
        let result = AlertEvaluator::evaluate("AAPL", 102.0, 100.0, 900.0, 1000.0, &thresholds());
        assert_eq!(result.volume_pct_change, -10.0);
        assert!(!result.triggered);
        assert!(result.divergence);
    }

    #[test]
    fn test_volume_alone_does_not_trigger() {
        let result = AlertEvaluator::evaluate("AAPL", 100.5, 100.0, 3000.0, 1000.0, &thresholds());
        assert!(!result.triggered);
    }

    #[test]
    fn test_price_down_volume_up_diverges() {
        let result = AlertEvaluator::evaluate("AAPL", 98.0, 100.0, 1500.0, 1000.0, &thresholds());
        assert_eq!(result.price_pct_change, -2.0);
        assert_eq!(result.volume_pct_change, 50.0);
        assert!(result.divergence);
        assert!(result.triggered);
    }

    #[test]
    fn test_zero_previous_values() {
        let result = AlertEvaluator::evaluate("AAPL", 102.0, 0.0, 1500.0, 0.0, &thresholds());
        assert_eq!(result.price_pct_change, 0.0);
        assert_eq!(result.volume_pct_change, 0.0);
        assert!(!result.triggered);
        assert!(!result.divergence);
    }

    #[test]
    fn test_zero_move_is_not_divergence() {
        let result = AlertEvaluator::evaluate("AAPL", 100.0, 100.0, 500.0, 1000.0, &thresholds());
        assert!(!result.divergence);
    }

    #[test]
    fn test_latest_with_single_bar_is_noop() {
        let result = AlertEvaluator::evaluate_latest(&series(&[(100.0, 1000.0)]), None, &thresholds()).unwrap();
        assert_eq!(result.price_pct_change, 0.0);
        assert_eq!(result.volume_pct_change, 0.0);
        assert!(!result.triggered);
    }

    #[test]
    fn test_latest_empty_series_is_no_data() {
        let err = AlertEvaluator::evaluate_latest(&BarSeries::empty("TEST"), None, &thresholds()).unwrap_err();
        assert!(matches!(err, EngineError::NoData(_)));
    }

    #[test]
    fn test_latest_uses_last_two_bars() {
        let s = series(&[(50.0, 10.0), (100.0, 1000.0), (102.0, 1500.0)]);
        let result = AlertEvaluator::evaluate_latest(&s, None, &thresholds()).unwrap();
        assert_eq!(result.price_pct_change, 2.0);
        assert!(result.triggered);
    }

    #[test]
    fn test_latest_with_session_baseline() {
        let s = series(&[(101.0, 1000.0), (102.0, 1500.0)]);
        let result = AlertEvaluator::evaluate_latest(&s, Some(100.0), &thresholds()).unwrap();
        assert_eq!(result.price_pct_change, 2.0);
        assert_eq!(result.volume_pct_change, 50.0);
        assert!(result.triggered);
    }

    #[test]
    fn test_mark_bars() {
        let s = series(&[(100.0, 1000.0), (102.0, 1500.0), (102.5, 1600.0)]);
        let marks = AlertEvaluator::mark_bars(&s, &thresholds());
        assert_eq!(marks.len(), 3);
        assert!(marks[0].price_pct_change.is_none());
        assert!(marks[0].volume_pct_change.is_none());
        assert!(!marks[0].anomaly);
        assert_eq!(marks[1].price_pct_change, Some(2.0));
        assert!(marks[1].anomaly);
        assert!(!marks[2].anomaly);
    }

    #[test]
    fn test_mark_bars_empty() {
        assert!(AlertEvaluator::mark_bars(&BarSeries::empty("TEST"), &thresholds()).is_empty());
    }
}
