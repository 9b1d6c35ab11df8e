//! Periodic multi-symbol refresh producing immutable snapshots.

use chrono::Utc;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::{MonitorConfig, PriceBaseline};
use crate::error::{EngineError, Result};
use crate::services::alerts::AlertEvaluator;
use crate::services::indicators::IndicatorEngine;
use crate::services::notifier::Notifier;
use crate::services::ranker::CrossSectionalRanker;
use crate::services::trend::SignalAnalyzer;
use crate::sources::{BarSource, FetchedBars};
use crate::types::{AlertNotification, MonitorSnapshot, SymbolReport, SymbolStatus};

/// Run the full engine pipeline for one symbol.
pub fn build_report(
    symbol: &str,
    fetched: &FetchedBars,
    config: &MonitorConfig,
) -> std::result::Result<SymbolReport, EngineError> {
    let series = &fetched.series;
    let last = series
        .last()
        .ok_or_else(|| EngineError::NoData(format!("no bars for {}", symbol)))?;

    let rows = IndicatorEngine::new(config.indicators).compute(series);
    let trend = SignalAnalyzer::default().classify(series, &rows)?;

    let baseline = match config.price_baseline {
        PriceBaseline::PriorBar => None,
        PriceBaseline::PreviousClose => fetched.previous_close,
    };
    let alert = AlertEvaluator::evaluate_latest(series, baseline, &config.thresholds)?;
    let marks = AlertEvaluator::mark_bars(series, &config.thresholds);

    let keep = config.history_rows;
    let tail = |len: usize| len.saturating_sub(keep);

    Ok(SymbolReport {
        symbol: symbol.to_string(),
        last_close: last.close(),
        last_time: last.time(),
        bar_count: series.len(),
        trend,
        alert,
        recent_rows: rows[tail(rows.len())..].to_vec(),
        recent_marks: marks[tail(marks.len())..].to_vec(),
    })
}

/// Fetches, analyzes and ranks the configured symbols.
pub struct Monitor<S> {
    source: Arc<S>,
    config: MonitorConfig,
    notifier: Arc<dyn Notifier>,
}

impl<S: BarSource> Monitor<S> {
    pub fn new(source: Arc<S>, config: MonitorConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            config,
            notifier,
        }
    }

    /// One refresh cycle over every symbol.
    ///
    /// A symbol whose fetch or analysis fails is reported as failed; the
    /// rest of the batch is still ranked and alerted on.
    pub async fn refresh(&self) -> MonitorSnapshot {
        let fetches = self.config.symbols.iter().map(|symbol| async move {
            let outcome = self.analyze_symbol(symbol).await;
            (symbol, outcome)
        });
        let outcomes = join_all(fetches).await;

        let mut statuses = Vec::with_capacity(outcomes.len());
        let mut alerts = Vec::new();
        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(report) => {
                    debug!(
                        "{}: {} bars, trend {}, price {:.2}%, volume {:.2}%",
                        symbol,
                        report.bar_count,
                        report.trend.label.name(),
                        report.alert.price_pct_change,
                        report.alert.volume_pct_change
                    );
                    alerts.push((symbol.clone(), report.alert));
                    statuses.push(SymbolStatus::Ready(report));
                }
                Err(e) => {
                    warn!("Failed to refresh {}: {}", symbol, e);
                    statuses.push(SymbolStatus::Failed {
                        symbol: symbol.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let ranking = CrossSectionalRanker::rank(alerts);

        for ranked in &ranking.triggered {
            let notification = AlertNotification::new(&ranked.symbol, &ranked.alert);
            if let Err(e) = self.notifier.notify(&notification) {
                error!("Failed to dispatch alert for {}: {}", ranked.symbol, e);
            }
        }

        info!(
            "Refreshed {} symbols ({} failed, {} alerts)",
            statuses.len(),
            statuses
                .iter()
                .filter(|s| matches!(s, SymbolStatus::Failed { .. }))
                .count(),
            ranking.triggered.len()
        );

        MonitorSnapshot {
            generated_at: Some(Utc::now()),
            period: self.config.period.clone(),
            interval: self.config.interval.clone(),
            symbols: statuses,
            ranking,
        }
    }

    async fn analyze_symbol(&self, symbol: &str) -> Result<SymbolReport> {
        let fetched = self
            .source
            .fetch_bars(symbol, &self.config.period, &self.config.interval)
            .await?;
        Ok(build_report(symbol, &fetched, &self.config)?)
    }

    /// Refresh on a fixed interval, publishing each snapshot.
    ///
    /// Returns once every receiver has been dropped.
    pub async fn run(self, tx: watch::Sender<Arc<MonitorSnapshot>>) {
        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.refresh_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let snapshot = self.refresh().await;
            if tx.send(Arc::new(snapshot)).is_err() {
                info!("No snapshot readers left, stopping monitor");
                break;
            }
        }
    }
}
