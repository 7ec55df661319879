//! Repository for the `model_profiles` table.

use sqlx::PgPool;
use steward_core::types::DbId;

use crate::models::model_profile::{CreateModelProfile, ModelProfile, UpdateModelProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, display_name, provider, context_window, \
     input_price, output_price, is_enabled, capabilities, created_at, updated_at";

/// Provides CRUD operations for the model catalog.
pub struct ModelProfileRepo;

impl ModelProfileRepo {
    /// Insert a new catalog entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateModelProfile,
    ) -> Result<ModelProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO model_profiles \
                (name, display_name, provider, context_window, input_price, \
                 output_price, capabilities) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModelProfile>(&query)
            .bind(&input.name)
            .bind(&input.display_name)
            .bind(&input.provider)
            .bind(input.context_window)
            .bind(input.input_price)
            .bind(input.output_price)
            .bind(&input.capabilities)
            .fetch_one(pool)
            .await
    }

    /// Find a catalog entry by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ModelProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM model_profiles WHERE id = $1");
        sqlx::query_as::<_, ModelProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List catalog entries ordered by name, optionally restricted to
    /// enabled models (the non-admin listing).
    pub async fn list(pool: &PgPool, enabled_only: bool) -> Result<Vec<ModelProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM model_profiles \
             WHERE is_enabled = true OR NOT $1 \
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, ModelProfile>(&query)
            .bind(enabled_only)
            .fetch_all(pool)
            .await
    }

    /// Update a catalog entry. Only non-`None` fields are applied; the
    /// provider model identifier is never touched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateModelProfile,
    ) -> Result<Option<ModelProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE model_profiles SET \
                display_name = COALESCE($2, display_name), \
                provider = COALESCE($3, provider), \
                context_window = COALESCE($4, context_window), \
                input_price = COALESCE($5, input_price), \
                output_price = COALESCE($6, output_price), \
                is_enabled = COALESCE($7, is_enabled), \
                capabilities = COALESCE($8, capabilities), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModelProfile>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.provider)
            .bind(input.context_window)
            .bind(input.input_price)
            .bind(input.output_price)
            .bind(input.is_enabled)
            .bind(&input.capabilities)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a catalog entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM model_profiles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
