//! Model catalog entry and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use steward_core::types::{DbId, Timestamp};

/// A row from the `model_profiles` table: one entry in the catalog of AI
/// models the platform exposes to apps.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModelProfile {
    pub id: DbId,
    /// Provider model identifier, e.g. `"gpt-4o-mini"`. Unique.
    pub name: String,
    pub display_name: String,
    pub provider: String,
    pub context_window: i32,
    /// Price per million input tokens, in USD.
    pub input_price: f64,
    /// Price per million output tokens, in USD.
    pub output_price: f64,
    pub is_enabled: bool,
    pub capabilities: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateModelProfile {
    pub name: String,
    pub display_name: String,
    pub provider: String,
    pub context_window: i32,
    pub input_price: f64,
    pub output_price: f64,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// DTO for updating a catalog entry. All fields are optional; the provider
/// model identifier (`name`) cannot be changed.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateModelProfile {
    pub display_name: Option<String>,
    pub provider: Option<String>,
    pub context_window: Option<i32>,
    pub input_price: Option<f64>,
    pub output_price: Option<f64>,
    pub is_enabled: Option<bool>,
    pub capabilities: Option<Vec<String>>,
}
