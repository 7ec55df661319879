//! Team and team membership models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use steward_core::types::{DbId, Timestamp};

/// A row from the `teams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A membership row joined with user details for listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub team_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    /// Role within the team: `"owner"` or `"member"`.
    pub member_role: String,
    pub added_at: Timestamp,
}

/// DTO for creating a new team.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an existing team. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub description: Option<String>,
}
