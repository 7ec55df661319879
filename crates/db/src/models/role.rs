//! Role model.

use serde::Serialize;
use sqlx::FromRow;
use steward_core::types::{DbId, Timestamp};

/// A row from the `roles` table. Roles are seeded by migration and never
/// created through the API.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}
