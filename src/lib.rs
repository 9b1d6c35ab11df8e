//! Tickwatch - indicator, trend and volume-anomaly monitor for stock bars

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;
use tokio::sync::watch;

use config::Config;

/// Application state shared across handlers.
///
/// Handlers only read the latest published snapshot.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub snapshot: watch::Receiver<Arc<types::MonitorSnapshot>>,
}

// Re-export commonly used types
pub use error::{AppError, EngineError};
pub use services::{
    AlertEvaluator, CrossSectionalRanker, IndicatorEngine, Monitor, SignalAnalyzer,
};
pub use types::*;
