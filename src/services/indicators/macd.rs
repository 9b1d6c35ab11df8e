//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_series;

/// MACD indicator.
///
/// - MACD Line = EMA(fast) - EMA(slow)
/// - Signal Line = EMA(signal) of MACD Line
///
/// The EMA recurrence yields values from the first bar, but both lines are
/// only exposed from index `slow - 1` onward.
#[derive(Debug, Clone, Copy)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// Gated MACD and signal lines, aligned to the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    pub fn min_periods(&self) -> usize {
        self.slow_period
    }

    pub fn calculate(&self, values: &[f64]) -> MacdLines {
        let len = values.len();
        if self.fast_period == 0 || self.slow_period == 0 || self.signal_period == 0 {
            return MacdLines {
                macd: vec![None; len],
                signal: vec![None; len],
            };
        }

        let fast = ema_series(values, self.fast_period);
        let slow = ema_series(values, self.slow_period);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_series(&line, self.signal_period);

        let first = self.min_periods() - 1;
        let gate = |series: Vec<f64>| -> Vec<Option<f64>> {
            series
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i >= first).then_some(v))
                .collect()
        };

        MacdLines {
            macd: gate(line),
            signal: gate(signal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(count: usize) -> Vec<f64> {
        (0..count).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn test_macd_gated_before_slow_period() {
        let lines = Macd::default().calculate(&ramp(40));
        for i in 0..25 {
            assert!(lines.macd[i].is_none(), "index {} should be gated", i);
            assert!(lines.signal[i].is_none());
        }
        for i in 25..40 {
            assert!(lines.macd[i].is_some(), "index {} should be available", i);
            assert!(lines.signal[i].is_some());
        }
    }

    #[test]
    fn test_macd_short_series_all_absent() {
        let lines = Macd::default().calculate(&ramp(25));
        assert_eq!(lines.macd.len(), 25);
        assert!(lines.macd.iter().all(Option::is_none));
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let lines = Macd::default().calculate(&ramp(60));
        let macd = lines.macd[59].unwrap();
        let signal = lines.signal[59].unwrap();
        assert!(macd > 0.0);
        // Signal lags a rising MACD.
        assert!(macd > signal);
    }

    #[test]
    fn test_macd_flat_series_is_zero() {
        let lines = Macd::default().calculate(&[50.0; 30]);
        assert_eq!(lines.macd[29], Some(0.0));
        assert_eq!(lines.signal[29], Some(0.0));
    }
}
