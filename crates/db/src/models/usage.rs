//! Usage analytics models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use steward_core::types::{DbId, Timestamp};

/// A row from the `usage_records` table: token consumption for one user,
/// model, and day bucket. Multiple ingests for the same bucket accumulate.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsageRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub app_id: Option<DbId>,
    pub model_name: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub request_count: i32,
    pub recorded_on: NaiveDate,
    pub created_at: Timestamp,
}

/// DTO for ingesting a usage record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUsageRecord {
    pub user_id: DbId,
    pub app_id: Option<DbId>,
    pub model_name: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    /// Number of requests this record covers. Defaults to 1.
    pub request_count: Option<i32>,
    /// Day bucket. Defaults to the current date.
    pub recorded_on: Option<NaiveDate>,
}

/// Aggregate totals over a date range.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsageSummary {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub request_count: i64,
}

/// One point in a per-day usage series.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyUsage {
    pub day: NaiveDate,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub request_count: i64,
}

/// Aggregate totals for one model across the platform.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModelUsage {
    pub model_name: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub request_count: i64,
}

/// Platform-wide counts for the admin dashboard overview.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformOverview {
    pub total_users: i64,
    pub active_users: i64,
    pub total_templates: i64,
    pub total_apps: i64,
    pub total_prompt_tokens: i64,
    pub total_completion_tokens: i64,
}
