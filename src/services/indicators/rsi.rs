//! Relative Strength Index (RSI) indicator.

use super::sma::rolling_mean;

/// RSI (Relative Strength Index) indicator.
///
/// Gains and losses are simple rolling means of the positive and negative
/// close-to-close changes. Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// A window with no losses reads 100.
#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// One extra bar for the first difference.
    pub fn min_periods(&self) -> usize {
        self.period + 1
    }

    pub fn calculate(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if self.period == 0 || values.len() < self.min_periods() {
            return out;
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = values
            .windows(2)
            .map(|pair| {
                let change = pair[1] - pair[0];
                (change.max(0.0), (-change).max(0.0))
            })
            .unzip();

        let avg_gains = rolling_mean(&gains, self.period);
        let avg_losses = rolling_mean(&losses, self.period);

        // Difference j describes bar j + 1.
        for (j, (gain, loss)) in avg_gains.iter().zip(&avg_losses).enumerate() {
            if let (Some(gain), Some(loss)) = (gain, loss) {
                out[j + 1] = Some(relative_strength_index(*gain, *loss));
            }
        }

        out
    }
}

fn relative_strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
