//! App template model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use steward_core::types::{DbId, Timestamp};

/// A row from the `templates` table.
///
/// `slug` is immutable after creation; the update DTO deliberately has no
/// slug field. `body` is HTML/text containing `{{dotted.path}}` markers and
/// `config_schema` is the schema document the dynamic form is built from.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub body: String,
    pub config_schema: serde_json::Value,
    pub ui_hints: Option<serde_json::Value>,
    pub is_active: bool,
    pub tags: Vec<String>,
    pub icon_url: Option<String>,
    pub dark_icon_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub body: String,
    pub config_schema: serde_json::Value,
    pub ui_hints: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub icon_url: Option<String>,
    pub dark_icon_url: Option<String>,
}

/// DTO for updating an existing template. All fields are optional; the slug
/// cannot be changed.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub config_schema: Option<serde_json::Value>,
    pub ui_hints: Option<serde_json::Value>,
    pub tags: Option<Vec<String>>,
    pub icon_url: Option<String>,
    pub dark_icon_url: Option<String>,
}
