//! Deployed app model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use steward_core::types::{DbId, Timestamp};

/// A row from the `apps` table: a concrete, named app created from a
/// template plus configuration values.
///
/// `custom_body` is an optional customized copy of the template body; when
/// present it replaces the template body at render time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct App {
    pub id: DbId,
    pub template_id: DbId,
    pub slug: String,
    pub name: String,
    pub owner_id: DbId,
    pub config_values: serde_json::Value,
    pub custom_body: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new app.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApp {
    pub template_id: DbId,
    pub slug: String,
    pub name: String,
    /// Defaults to the template schema's declared defaults when omitted.
    pub config_values: Option<serde_json::Value>,
    pub custom_body: Option<String>,
}

/// DTO for updating an existing app. All fields are optional; the slug and
/// template reference cannot be changed.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApp {
    pub name: Option<String>,
    pub config_values: Option<serde_json::Value>,
    pub custom_body: Option<String>,
    pub is_active: Option<bool>,
}
