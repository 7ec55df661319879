//! Repository for the `templates` table.

use sqlx::PgPool;
use steward_core::types::DbId;

use crate::models::template::{CreateTemplate, Template, UpdateTemplate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, name, description, body, config_schema, ui_hints, \
     is_active, tags, icon_url, dark_icon_url, created_at, updated_at";

/// Provides CRUD operations for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates \
                (slug, name, description, body, config_schema, ui_hints, tags, \
                 icon_url, dark_icon_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.body)
            .bind(&input.config_schema)
            .bind(&input.ui_hints)
            .bind(&input.tags)
            .bind(&input.icon_url)
            .bind(&input.dark_icon_url)
            .fetch_one(pool)
            .await
    }

    /// Find a template by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE slug = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a template by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List templates ordered by name, optionally including inactive ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates \
             WHERE is_active = true OR $1 \
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a template in place. Only non-`None` fields are applied; the
    /// slug is never touched.
    ///
    /// Returns `None` if no row with the given slug exists.
    pub async fn update(
        pool: &PgPool,
        slug: &str,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                body = COALESCE($4, body), \
                config_schema = COALESCE($5, config_schema), \
                ui_hints = COALESCE($6, ui_hints), \
                tags = COALESCE($7, tags), \
                icon_url = COALESCE($8, icon_url), \
                dark_icon_url = COALESCE($9, dark_icon_url), \
                updated_at = NOW() \
             WHERE slug = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(slug)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.body)
            .bind(&input.config_schema)
            .bind(&input.ui_hints)
            .bind(&input.tags)
            .bind(&input.icon_url)
            .bind(&input.dark_icon_url)
            .fetch_optional(pool)
            .await
    }

    /// Set the active flag. Returns `true` if the row changed.
    pub async fn set_active(pool: &PgPool, slug: &str, active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE templates SET is_active = $2, updated_at = NOW() \
             WHERE slug = $1 AND is_active <> $2",
        )
        .bind(slug)
        .bind(active)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a template by slug. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
