//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! repository and service layers.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use super::dto::{ConsolidatedResponse, HealthResponse, Stats, StatsQuery, SyncResponse};
use super::error::AppError;
use super::state::AppState;
use crate::services::{compute_stats, filter_by_range, normalize_and_sort};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Agenda
// =============================================================================

/// GET /api/agenda/consolidated
///
/// Stored consolidated records, in stored order.
pub async fn get_consolidated(
    State(state): State<AppState>,
) -> HandlerResult<ConsolidatedResponse> {
    let records = state.repository.list_consolidated().await?;
    Ok(Json(ConsolidatedResponse::new(records)))
}

/// GET /api/agenda/stats?start=YYYY-MM-DD&end=YYYY-MM-DD
///
/// Summary statistics over the stored records, optionally restricted to an
/// inclusive date range.
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> HandlerResult<Stats> {
    let range = query.to_range().map_err(AppError::BadRequest)?;
    let records = state.repository.list_consolidated().await?;

    let chart = normalize_and_sort(&records);
    let filtered = filter_by_range(&chart, &range);
    Ok(Json(compute_stats(&filtered)))
}

/// POST /api/agenda/sync
///
/// Re-read the spreadsheet and replace the stored agenda.
pub async fn sync_agenda(State(state): State<AppState>) -> HandlerResult<SyncResponse> {
    let sync = state
        .sync
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Spreadsheet sync is not configured".to_string()))?;

    info!("Sync requested over HTTP");
    let outcome = sync.sync().await?;

    Ok(Json(SyncResponse {
        success: true,
        message: outcome.message,
        count: outcome.count,
    }))
}
