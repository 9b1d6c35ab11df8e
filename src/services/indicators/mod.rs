//! Technical indicator implementations and the row-building engine.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{BollingerBands, BollingerLines};
pub use ema::Ema;
pub use macd::{Macd, MacdLines};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::types::{BarSeries, IndicatorRow, IndicatorSettings};

/// Computes every indicator column for a bar series.
///
/// Pure: the same series always yields the same rows. Indicators that need
/// more history than the series holds are reported as absent rather than
/// failing, so a short series still produces a full-length row sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
}

impl IndicatorEngine {
    pub fn new(settings: IndicatorSettings) -> Self {
        Self { settings }
    }

    /// One row per bar, in series order.
    pub fn compute(&self, series: &BarSeries) -> Vec<IndicatorRow> {
        let s = &self.settings;
        let closes = series.closes();

        let ma = Sma::new(s.ma_window).calculate(&closes);
        let ema = Ema::new(s.ema_span).calculate(&closes);
        let macd = Macd::new(s.macd_fast, s.macd_slow, s.macd_signal).calculate(&closes);
        let bands = BollingerBands::new(s.boll_window, s.boll_k).calculate(&closes);
        let rsi = Rsi::new(s.rsi_window).calculate(&closes);

        series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| IndicatorRow {
                time: bar.time(),
                close: bar.close(),
                ma: ma[i],
                ema: ema[i],
                macd: macd.macd[i],
                signal: macd.signal[i],
                upper_band: bands.upper[i],
                lower_band: bands.lower[i],
                rsi: rsi[i],
            })
            .collect()
    }
}
