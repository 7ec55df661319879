//! Repository for the `usage_records` table and dashboard aggregates.

use chrono::NaiveDate;
use sqlx::PgPool;
use steward_core::types::DbId;

use crate::models::usage::{
    CreateUsageRecord, DailyUsage, ModelUsage, PlatformOverview, UsageRecord, UsageSummary,
};

/// Column list shared across `usage_records` queries.
const COLUMNS: &str = "id, user_id, app_id, model_name, prompt_tokens, \
     completion_tokens, request_count, recorded_on, created_at";

/// Provides ingest and aggregate queries for usage analytics.
pub struct UsageRepo;

impl UsageRepo {
    /// Ingest a usage record.
    ///
    /// Records for the same (user, app, model, day) bucket accumulate via
    /// `ON CONFLICT` so a chatty ingester does not bloat the table.
    pub async fn ingest(pool: &PgPool, input: &CreateUsageRecord) -> Result<UsageRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO usage_records \
                (user_id, app_id, model_name, prompt_tokens, completion_tokens, \
                 request_count, recorded_on) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 1), COALESCE($7, CURRENT_DATE)) \
             ON CONFLICT (user_id, app_id, model_name, recorded_on) DO UPDATE SET \
                prompt_tokens = usage_records.prompt_tokens + EXCLUDED.prompt_tokens, \
                completion_tokens = usage_records.completion_tokens + EXCLUDED.completion_tokens, \
                request_count = usage_records.request_count + EXCLUDED.request_count \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UsageRecord>(&query)
            .bind(input.user_id)
            .bind(input.app_id)
            .bind(&input.model_name)
            .bind(input.prompt_tokens)
            .bind(input.completion_tokens)
            .bind(input.request_count)
            .bind(input.recorded_on)
            .fetch_one(pool)
            .await
    }

    /// Aggregate totals for one user over an inclusive date range.
    pub async fn summary_for_user(
        pool: &PgPool,
        user_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<UsageSummary, sqlx::Error> {
        sqlx::query_as::<_, UsageSummary>(
            "SELECT \
                COALESCE(SUM(prompt_tokens), 0)::BIGINT AS prompt_tokens, \
                COALESCE(SUM(completion_tokens), 0)::BIGINT AS completion_tokens, \
                COALESCE(SUM(request_count), 0)::BIGINT AS request_count \
             FROM usage_records \
             WHERE user_id = $1 AND recorded_on BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }

    /// Platform-wide per-day series over an inclusive date range, for the
    /// dashboard charts. Days without records are absent from the series.
    pub async fn daily_series(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyUsage>, sqlx::Error> {
        sqlx::query_as::<_, DailyUsage>(
            "SELECT \
                recorded_on AS day, \
                COALESCE(SUM(prompt_tokens), 0)::BIGINT AS prompt_tokens, \
                COALESCE(SUM(completion_tokens), 0)::BIGINT AS completion_tokens, \
                COALESCE(SUM(request_count), 0)::BIGINT AS request_count \
             FROM usage_records \
             WHERE recorded_on BETWEEN $1 AND $2 \
             GROUP BY recorded_on \
             ORDER BY recorded_on ASC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Platform-wide aggregates grouped by model, largest consumers first.
    pub async fn model_breakdown(pool: &PgPool) -> Result<Vec<ModelUsage>, sqlx::Error> {
        sqlx::query_as::<_, ModelUsage>(
            "SELECT \
                model_name, \
                COALESCE(SUM(prompt_tokens), 0)::BIGINT AS prompt_tokens, \
                COALESCE(SUM(completion_tokens), 0)::BIGINT AS completion_tokens, \
                COALESCE(SUM(request_count), 0)::BIGINT AS request_count \
             FROM usage_records \
             GROUP BY model_name \
             ORDER BY SUM(prompt_tokens) + SUM(completion_tokens) DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Platform-wide counts for the admin dashboard overview.
    pub async fn platform_overview(pool: &PgPool) -> Result<PlatformOverview, sqlx::Error> {
        sqlx::query_as::<_, PlatformOverview>(
            "SELECT \
                (SELECT COUNT(*) FROM users)::BIGINT AS total_users, \
                (SELECT COUNT(*) FROM users WHERE is_active = true)::BIGINT AS active_users, \
                (SELECT COUNT(*) FROM templates)::BIGINT AS total_templates, \
                (SELECT COUNT(*) FROM apps)::BIGINT AS total_apps, \
                (SELECT COALESCE(SUM(prompt_tokens), 0) FROM usage_records)::BIGINT \
                    AS total_prompt_tokens, \
                (SELECT COALESCE(SUM(completion_tokens), 0) FROM usage_records)::BIGINT \
                    AS total_completion_tokens",
        )
        .fetch_one(pool)
        .await
    }
}
