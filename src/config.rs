use std::env;
use std::str::FromStr;
use tracing::warn;

use crate::sources::{INTERVAL_OPTIONS, PERIOD_OPTIONS};
use crate::types::{AlertThresholds, IndicatorSettings};

/// Which close the latest price change is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBaseline {
    /// The close of the bar before the latest one.
    #[default]
    PriorBar,
    /// The previous session close reported by the data source, falling back
    /// to the prior bar when the source has none.
    PreviousClose,
}

impl PriceBaseline {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "prior_bar" | "bar" => Some(Self::PriorBar),
            "previous_close" | "session" => Some(Self::PreviousClose),
            _ => None,
        }
    }
}

/// Monitor loop configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Symbols to watch, upper-cased.
    pub symbols: Vec<String>,
    /// Lookback period requested from the data source.
    pub period: String,
    /// Bar interval requested from the data source.
    pub interval: String,
    /// Seconds between refreshes.
    pub refresh_secs: u64,
    /// Indicator windows and spans.
    pub indicators: IndicatorSettings,
    /// Dual-condition alert thresholds.
    pub thresholds: AlertThresholds,
    /// Baseline for the latest price change.
    pub price_baseline: PriceBaseline,
    /// Number of trailing rows kept per symbol report.
    pub history_rows: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            symbols: parse_symbols(DEFAULT_SYMBOLS),
            period: "5d".to_string(),
            interval: "5m".to_string(),
            refresh_secs: 300,
            indicators: IndicatorSettings::default(),
            thresholds: AlertThresholds::default(),
            price_baseline: PriceBaseline::PriorBar,
            history_rows: 10,
        }
    }
}

const DEFAULT_SYMBOLS: &str = "AAPL, MSFT, TSLA";

/// Split a comma-separated symbol list, trimming and upper-casing entries.
pub fn parse_symbols(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Monitor configuration.
    pub monitor: MonitorConfig,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Keep `value` if it is one of `options`, else warn and fall back.
fn one_of(key: &str, value: String, options: &[&str], default: &str) -> String {
    if options.contains(&value.as_str()) {
        value
    } else {
        warn!(
            "Unsupported {} {:?} (expected one of {:?}), using {}",
            key, value, options, default
        );
        default.to_string()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = MonitorConfig::default();
        let indicator_defaults = defaults.indicators;

        let symbols = env::var("WATCH_SYMBOLS")
            .map(|s| parse_symbols(&s))
            .unwrap_or_else(|_| defaults.symbols.clone());

        let period = one_of(
            "WATCH_PERIOD",
            env::var("WATCH_PERIOD").unwrap_or_else(|_| defaults.period.clone()),
            PERIOD_OPTIONS,
            &defaults.period,
        );
        let interval = one_of(
            "WATCH_INTERVAL",
            env::var("WATCH_INTERVAL").unwrap_or_else(|_| defaults.interval.clone()),
            INTERVAL_OPTIONS,
            &defaults.interval,
        );

        let price_baseline = env::var("PRICE_BASELINE")
            .ok()
            .and_then(|v| PriceBaseline::from_str(&v))
            .unwrap_or(defaults.price_baseline);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 3001),
            monitor: MonitorConfig {
                symbols,
                period,
                interval,
                refresh_secs: env_or("REFRESH_INTERVAL_SECS", defaults.refresh_secs),
                indicators: IndicatorSettings {
                    ma_window: env_or("MA_WINDOW", indicator_defaults.ma_window),
                    ema_span: env_or("EMA_SPAN", indicator_defaults.ema_span),
                    macd_fast: env_or("MACD_FAST", indicator_defaults.macd_fast),
                    macd_slow: env_or("MACD_SLOW", indicator_defaults.macd_slow),
                    macd_signal: env_or("MACD_SIGNAL", indicator_defaults.macd_signal),
                    rsi_window: env_or("RSI_WINDOW", indicator_defaults.rsi_window),
                    boll_window: env_or("BOLL_WINDOW", indicator_defaults.boll_window),
                    boll_k: env_or("BOLL_K", indicator_defaults.boll_k),
                },
                thresholds: AlertThresholds {
                    price_pct: env_or("PRICE_THRESHOLD_PCT", defaults.thresholds.price_pct),
                    volume_pct: env_or("VOLUME_THRESHOLD_PCT", defaults.thresholds.volume_pct),
                },
                price_baseline,
                history_rows: env_or("HISTORY_ROWS", defaults.history_rows),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Symbol list Tests
    // =========================================================================

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse_symbols("aapl, msft ,TSLA"), vec!["AAPL", "MSFT", "TSLA"]);
        assert_eq!(parse_symbols(" , ,"), Vec::<String>::new());
        assert_eq!(parse_symbols("brk.b"), vec!["BRK.B"]);
    }

    // =========================================================================
    // PriceBaseline Tests
    // =========================================================================

    #[test]
    fn test_price_baseline_from_str() {
        assert_eq!(PriceBaseline::from_str("prior_bar"), Some(PriceBaseline::PriorBar));
        assert_eq!(
            PriceBaseline::from_str("PREVIOUS_CLOSE"),
            Some(PriceBaseline::PreviousClose)
        );
        assert_eq!(PriceBaseline::from_str("session"), Some(PriceBaseline::PreviousClose));
        assert_eq!(PriceBaseline::from_str("nope"), None);
    }

    // =========================================================================
    // MonitorConfig Tests
    // =========================================================================

    #[test]
    fn test_monitor_config_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.symbols, vec!["AAPL", "MSFT", "TSLA"]);
        assert_eq!(config.period, "5d");
        assert_eq!(config.interval, "5m");
        assert_eq!(config.refresh_secs, 300);
        assert_eq!(config.thresholds.price_pct, 2.0);
        assert_eq!(config.thresholds.volume_pct, 50.0);
        assert_eq!(config.history_rows, 10);
        assert!(config.indicators.validate().is_ok());
    }

    #[test]
    fn test_one_of_falls_back() {
        assert_eq!(one_of("WATCH_PERIOD", "1mo".to_string(), PERIOD_OPTIONS, "5d"), "1mo");
        assert_eq!(one_of("WATCH_PERIOD", "7y".to_string(), PERIOD_OPTIONS, "5d"), "5d");
        assert_eq!(one_of("WATCH_INTERVAL", "1h".to_string(), INTERVAL_OPTIONS, "5m"), "1h");
    }

    #[test]
    fn test_env_or_unset_uses_default() {
        assert_eq!(env_or("TICKWATCH_TEST_UNSET_KEY", 42u64), 42);
    }

    #[test]
    fn test_env_or_unparseable_uses_default() {
        env::set_var("TICKWATCH_TEST_GARBAGE_KEY", "not-a-number");
        assert_eq!(env_or("TICKWATCH_TEST_GARBAGE_KEY", 42u64), 42);

        env::set_var("TICKWATCH_TEST_PADDED_KEY", " 7 ");
        assert_eq!(env_or("TICKWATCH_TEST_PADDED_KEY", 42u64), 7);
    }

    #[test]
    fn test_env_or_accepts_nan_thresholds_for_validate_to_reject() {
        env::set_var("TICKWATCH_TEST_NAN_KEY", "nan");
        let price_pct: f64 = env_or("TICKWATCH_TEST_NAN_KEY", 2.0);
        assert!(price_pct.is_nan());

        let thresholds = AlertThresholds {
            price_pct,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }

    // =========================================================================
    // Config Tests
    // =========================================================================

    #[test]
    fn test_config_clone() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            monitor: MonitorConfig::default(),
        };

        let cloned = config.clone();
        assert_eq!(cloned.host, config.host);
        assert_eq!(cloned.port, config.port);
        assert_eq!(cloned.monitor, config.monitor);
    }
}
