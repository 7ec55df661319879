//! Route definitions for usage ingestion and analytics.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/usage`.
///
/// ```text
/// POST /         -> ingest_usage (operator+)
/// GET  /summary  -> own_usage_summary
/// ```
pub fn usage_router() -> Router<AppState> {
    Router::new()
        .route("/", post(stats::ingest_usage))
        .route("/summary", get(stats::own_usage_summary))
}

/// Routes mounted at `/admin/stats`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET /overview -> platform_overview
/// GET /usage    -> usage_series
/// GET /models   -> model_breakdown
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(stats::platform_overview))
        .route("/usage", get(stats::usage_series))
        .route("/models", get(stats::model_breakdown))
}
