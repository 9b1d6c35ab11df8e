//! Simple Moving Average (SMA) indicator.

/// SMA (Simple Moving Average) indicator.
///
/// Arithmetic mean of the trailing `period` values. Defined from index
/// `period - 1` onward.
#[derive(Debug, Clone, Copy)]
pub struct Sma {
    period: usize,
}

impl Default for Sma {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    /// One entry per input value; `None` during warm-up.
    pub fn calculate(&self, values: &[f64]) -> Vec<Option<f64>> {
        if values.len() < self.min_periods() {
            return vec![None; values.len()];
        }
        rolling_mean(values, self.period)
    }
}

/// Trailing mean over `period` values, aligned to the input.
pub(crate) fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for (i, window) in values.windows(period).enumerate() {
        out[i + period - 1] = Some(window.iter().sum::<f64>() / period as f64);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_warmup_is_absent() {
        let values: Vec<f64> = (1..=5).map(|x| x as f64).collect();
        let sma = Sma::new(3).calculate(&values);
        assert_eq!(sma, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_short_input() {
        let sma = Sma::new(20).calculate(&[1.0; 19]);
        assert_eq!(sma.len(), 19);
        assert!(sma.iter().all(Option::is_none));
    }

    #[test]
    fn test_sma_first_available_at_period() {
        let sma = Sma::default().calculate(&[5.0; 20]);
        assert_eq!(sma[19], Some(5.0));
        assert!(sma[18].is_none());
    }

    #[test]
    fn test_zero_period_never_available() {
        assert_eq!(rolling_mean(&[1.0, 2.0], 0), vec![None, None]);
    }
}
