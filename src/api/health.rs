use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::MonitorSnapshot;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    /// "starting" until the first refresh lands, then "ok" or "degraded".
    status: &'static str,
    version: &'static str,
    last_refresh: Option<DateTime<Utc>>,
    watched: usize,
    failed: usize,
}

impl HealthResponse {
    fn from_snapshot(snapshot: &MonitorSnapshot, watched: usize) -> Self {
        let failed = snapshot.failed_count();
        let status = match snapshot.generated_at {
            None => "starting",
            Some(_) if failed > 0 => "degraded",
            Some(_) => "ok",
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            last_refresh: snapshot.generated_at,
            watched,
            failed,
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.snapshot.borrow().clone();
    Json(HealthResponse::from_snapshot(
        &snapshot,
        state.config.monitor.symbols.len(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
