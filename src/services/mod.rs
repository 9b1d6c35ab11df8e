pub mod alerts;
pub mod indicators;
pub mod monitor;
pub mod notifier;
pub mod ranker;
pub mod trend;

pub use alerts::AlertEvaluator;
pub use indicators::IndicatorEngine;
pub use monitor::{build_report, Monitor};
pub use notifier::{ChannelNotifier, LogNotifier, Notifier};
pub use ranker::CrossSectionalRanker;
pub use trend::SignalAnalyzer;
