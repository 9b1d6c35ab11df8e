//! Snapshot API endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::ranker::by_abs_price_change;
use crate::types::{MonitorSnapshot, RankedAlert, SymbolStatus};
use crate::AppState;

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeta {
    /// When the snapshot behind this response was produced.
    pub generated_at: Option<DateTime<Utc>>,
}

impl<T> ApiResponse<T> {
    fn new(data: T, snapshot: &MonitorSnapshot) -> Self {
        Self {
            data,
            meta: ApiMeta {
                generated_at: snapshot.generated_at,
            },
        }
    }
}

/// Query parameters for the movers endpoint.
#[derive(Debug, Deserialize)]
pub struct MoversQuery {
    /// "volume" (default) or "price".
    pub sort: Option<String>,
}

/// Movers summary across symbols.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoversResponse {
    pub sort: String,
    pub ranked: Vec<RankedAlert>,
    pub divergent: Vec<RankedAlert>,
    pub triggered: Vec<RankedAlert>,
}

/// Create the monitor router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/snapshot", get(get_snapshot))
        .route("/symbols/:symbol", get(get_symbol))
        .route("/movers", get(get_movers))
}

/// GET /api/snapshot
async fn get_snapshot(State(state): State<AppState>) -> Json<ApiResponse<MonitorSnapshot>> {
    let snapshot = state.snapshot.borrow().clone();
    Json(ApiResponse::new(snapshot.as_ref().clone(), &snapshot))
}

/// GET /api/symbols/:symbol
async fn get_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<SymbolStatus>>> {
    let snapshot = state.snapshot.borrow().clone();
    let status = snapshot
        .status(&symbol)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Symbol {} is not being watched", symbol)))?;

    Ok(Json(ApiResponse::new(status, &snapshot)))
}

/// GET /api/movers
async fn get_movers(
    State(state): State<AppState>,
    Query(query): Query<MoversQuery>,
) -> Result<Json<ApiResponse<MoversResponse>>> {
    let snapshot = state.snapshot.borrow().clone();
    let ranking = &snapshot.ranking;

    let sort = query.sort.unwrap_or_else(|| "volume".to_string()).to_lowercase();
    let ranked = match sort.as_str() {
        "volume" => ranking.by_volume.clone(),
        "price" => {
            let mut ranked = ranking.by_volume.clone();
            ranked.sort_by(by_abs_price_change);
            ranked
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown sort {:?}, expected \"volume\" or \"price\"",
                other
            )))
        }
    };

    let response = MoversResponse {
        sort,
        ranked,
        divergent: ranking.divergent.clone(),
        triggered: ranking.triggered.clone(),
    };
    Ok(Json(ApiResponse::new(response, &snapshot)))
}
