//! Handlers for usage ingestion and analytics.
//!
//! Usage records are day buckets per user, app, and model; repeated ingests
//! for the same bucket accumulate. Users read their own summary at
//! `/usage/summary`; the platform-wide views live under `/admin/stats`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use steward_core::error::CoreError;
use steward_db::models::usage::{
    CreateUsageRecord, DailyUsage, ModelUsage, PlatformOverview, UsageRecord, UsageSummary,
};
use steward_db::repositories::UsageRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireOperator};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default window in days when a range query omits `from`.
const DEFAULT_RANGE_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// POST /api/v1/usage
///
/// Ingest a usage record. Operator role or above; the gateway reporting
/// consumption authenticates as an operator service account.
pub async fn ingest_usage(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Json(input): Json<CreateUsageRecord>,
) -> AppResult<(StatusCode, Json<DataResponse<UsageRecord>>)> {
    if input.prompt_tokens < 0 || input.completion_tokens < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Token counts must not be negative".into(),
        )));
    }
    if matches!(input.request_count, Some(n) if n <= 0) {
        return Err(AppError::Core(CoreError::Validation(
            "request_count must be positive".into(),
        )));
    }

    let record = UsageRepo::ingest(&state.pool, &input).await?;
    tracing::debug!(
        record_id = record.id,
        user_id = record.user_id,
        model = %record.model_name,
        ingested_by = operator.user_id,
        "Usage record ingested"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

// ---------------------------------------------------------------------------
// User surface
// ---------------------------------------------------------------------------

/// GET /api/v1/usage/summary
///
/// The caller's aggregate token usage over a date range. Defaults to the
/// last thirty days.
pub async fn own_usage_summary(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<UsageSummary>>> {
    let (from, to) = resolve_range(&params)?;
    let summary = UsageRepo::summary_for_user(&state.pool, auth.user_id, from, to).await?;
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/stats/overview
///
/// Platform-wide counts for the dashboard landing page.
pub async fn platform_overview(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PlatformOverview>>> {
    let overview = UsageRepo::platform_overview(&state.pool).await?;
    Ok(Json(DataResponse { data: overview }))
}

/// GET /api/v1/admin/stats/usage
///
/// Platform-wide per-day usage series over a date range. Defaults to the
/// last thirty days; days without records are absent.
pub async fn usage_series(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<DailyUsage>>>> {
    let (from, to) = resolve_range(&params)?;
    let series = UsageRepo::daily_series(&state.pool, from, to).await?;
    Ok(Json(DataResponse { data: series }))
}

/// GET /api/v1/admin/stats/models
///
/// Platform-wide usage grouped by model, largest consumers first.
pub async fn model_breakdown(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ModelUsage>>>> {
    let breakdown = UsageRepo::model_breakdown(&state.pool).await?;
    Ok(Json(DataResponse { data: breakdown }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a range query to concrete inclusive bounds: `to` defaults to
/// today, `from` to thirty days before `to`.
fn resolve_range(params: &DateRangeParams) -> AppResult<(NaiveDate, NaiveDate)> {
    let to = params.to.unwrap_or_else(|| Utc::now().date_naive());
    let from = params
        .from
        .unwrap_or_else(|| to - Duration::days(DEFAULT_RANGE_DAYS));

    if from > to {
        return Err(AppError::Core(CoreError::Validation(
            "from must not be after to".into(),
        )));
    }

    Ok((from, to))
}
