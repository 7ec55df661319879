//! Repository for the `apps` table.

use sqlx::PgPool;
use steward_core::types::DbId;

use crate::models::app::{App, CreateApp, UpdateApp};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, template_id, slug, name, owner_id, config_values, \
     custom_body, is_active, created_at, updated_at";

/// Provides CRUD operations for deployed apps.
pub struct AppRepo;

impl AppRepo {
    /// Insert a new app, returning the created row.
    ///
    /// `config_values` must already be resolved (caller merges schema
    /// defaults when the DTO omits them).
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateApp,
        config_values: &serde_json::Value,
    ) -> Result<App, sqlx::Error> {
        let query = format!(
            "INSERT INTO apps (template_id, slug, name, owner_id, config_values, custom_body) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, App>(&query)
            .bind(input.template_id)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(owner_id)
            .bind(config_values)
            .bind(&input.custom_body)
            .fetch_one(pool)
            .await
    }

    /// Find an app by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<App>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apps WHERE id = $1");
        sqlx::query_as::<_, App>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List apps owned by a user, most recently created first.
    pub async fn list_for_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<App>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM apps WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, App>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List all apps, most recently created first (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<App>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apps ORDER BY created_at DESC");
        sqlx::query_as::<_, App>(&query).fetch_all(pool).await
    }

    /// Update an app. Only non-`None` fields are applied; slug and template
    /// reference are never touched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateApp,
    ) -> Result<Option<App>, sqlx::Error> {
        let query = format!(
            "UPDATE apps SET \
                name = COALESCE($2, name), \
                config_values = COALESCE($3, config_values), \
                custom_body = COALESCE($4, custom_body), \
                is_active = COALESCE($5, is_active), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, App>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.config_values)
            .bind(&input.custom_body)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an app by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count apps referencing a template. Creation screens use this to warn
    /// before template deletion.
    pub async fn count_for_template(pool: &PgPool, template_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM apps WHERE template_id = $1")
            .bind(template_id)
            .fetch_one(pool)
            .await
    }
}
