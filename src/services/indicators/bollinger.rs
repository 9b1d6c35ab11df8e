//! Bollinger Bands indicator.

use super::sma::rolling_mean;

/// Bollinger Bands indicator.
///
/// - Upper band: MA + k * StdDev
/// - Lower band: MA - k * StdDev
///
/// Both the middle line and StdDev (sample, n - 1) are taken over the same
/// trailing `period` values.
#[derive(Debug, Clone, Copy)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

/// Gated middle, upper and lower bands, aligned to the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerLines {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    /// Bands from index `period - 1` onward.
    pub fn calculate(&self, values: &[f64]) -> BollingerLines {
        if self.period < 2 || values.len() < self.min_periods() {
            let empty = vec![None; values.len()];
            return BollingerLines {
                middle: empty.clone(),
                upper: empty.clone(),
                lower: empty,
            };
        }

        let middle = rolling_mean(values, self.period);
        let std_devs = rolling_sample_std(values, self.period);

        let (upper, lower): (Vec<Option<f64>>, Vec<Option<f64>>) = std_devs
            .iter()
            .zip(&middle)
            .map(|(sd, mid)| match (sd, mid) {
                (Some(sd), Some(mid)) => (
                    Some(mid + self.std_dev_multiplier * sd),
                    Some(mid - self.std_dev_multiplier * sd),
                ),
                _ => (None, None),
            })
            .unzip();

        BollingerLines {
            middle,
            upper,
            lower,
        }
    }
}

/// Trailing sample standard deviation (n - 1 denominator).
fn rolling_sample_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period < 2 || values.len() < period {
        return out;
    }

    for (i, window) in values.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance =
            window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        out[i + period - 1] = Some(variance.sqrt());
    }

    out
}
