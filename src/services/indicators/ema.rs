//! Exponential Moving Average (EMA) indicator.

/// EMA (Exponential Moving Average) indicator.
///
/// `EMA[i] = x[i] * a + EMA[i-1] * (1 - a)` with `a = 2 / (span + 1)`,
/// seeded with the first value. Unlike SMA there is no warm-up gap.
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    span: usize,
}

impl Default for Ema {
    fn default() -> Self {
        Self { span: 20 }
    }
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    pub fn min_periods(&self) -> usize {
        1
    }

    pub fn calculate(&self, values: &[f64]) -> Vec<Option<f64>> {
        if self.span == 0 || values.len() < self.min_periods() {
            return vec![None; values.len()];
        }
        ema_series(values, self.span).into_iter().map(Some).collect()
    }
}

/// Raw EMA recurrence over every value.
pub(crate) fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out: Vec<f64> = Vec::with_capacity(values.len());

    for &value in values {
        let next = match out.last() {
            Some(&prev) => value * alpha + prev * (1.0 - alpha),
            None => value,
        };
        out.push(next);
    }

    out
}
