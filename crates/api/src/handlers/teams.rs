//! Handlers for the `/teams` resource.
//!
//! Teams group users for shared visibility. Creating a team makes the
//! caller its owner; only the owner or an admin can mutate the team or its
//! membership. The team owner's membership row cannot be removed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use steward_core::error::CoreError;
use steward_core::roles::ROLE_ADMIN;
use steward_core::types::DbId;
use steward_db::models::team::{CreateTeam, Team, TeamMember, UpdateTeam};
use steward_db::repositories::{TeamRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /teams/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/teams
///
/// List teams: admins see every team, everyone else sees teams they belong to.
pub async fn list_teams(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Team>>>> {
    let teams = if auth.role == ROLE_ADMIN {
        TeamRepo::list_all(&state.pool).await?
    } else {
        TeamRepo::list_for_user(&state.pool, auth.user_id).await?
    };
    Ok(Json(DataResponse { data: teams }))
}

/// POST /api/v1/teams
///
/// Create a team owned by the caller. The owner is seeded as the first member.
pub async fn create_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTeam>,
) -> AppResult<(StatusCode, Json<DataResponse<Team>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Team name must not be empty".into(),
        )));
    }

    let team = TeamRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(team_id = team.id, user_id = auth.user_id, "Team created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: team })))
}

/// GET /api/v1/teams/{id}
pub async fn get_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Team>>> {
    let team = find_team(&state, id).await?;
    require_member_or_admin(&state, &auth, &team).await?;
    Ok(Json(DataResponse { data: team }))
}

/// PUT /api/v1/teams/{id}
pub async fn update_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTeam>,
) -> AppResult<Json<DataResponse<Team>>> {
    let team = find_team(&state, id).await?;
    require_owner_or_admin(&auth, &team)?;

    let updated = TeamRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Team", id }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/teams/{id}
///
/// Delete a team; memberships cascade.
pub async fn delete_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let team = find_team(&state, id).await?;
    require_owner_or_admin(&auth, &team)?;

    TeamRepo::delete(&state.pool, id).await?;
    tracing::info!(team_id = id, user_id = auth.user_id, "Team deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// GET /api/v1/teams/{id}/members
pub async fn list_members(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TeamMember>>>> {
    let team = find_team(&state, id).await?;
    require_member_or_admin(&state, &auth, &team).await?;

    let members = TeamRepo::list_members(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/teams/{id}/members
///
/// Add a user to a team. Duplicate additions surface as a 409 via the
/// unique constraint on (team_id, user_id).
pub async fn add_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<StatusCode> {
    let team = find_team(&state, id).await?;
    require_owner_or_admin(&auth, &team)?;

    let user = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot add a deactivated user to a team".into(),
        )));
    }

    TeamRepo::add_member(&state.pool, id, input.user_id).await?;
    tracing::info!(team_id = id, user_id = input.user_id, "Team member added");

    Ok(StatusCode::CREATED)
}

/// DELETE /api/v1/teams/{id}/members/{user_id}
///
/// Remove a member. The owner's membership row cannot be removed; delete
/// the team instead.
pub async fn remove_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let team = find_team(&state, id).await?;
    require_owner_or_admin(&auth, &team)?;

    if user_id == team.owner_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot remove the team owner".into(),
        )));
    }

    let removed = TeamRepo::remove_member(&state.pool, id, user_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "TeamMember",
            id: user_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_team(state: &AppState, id: DbId) -> AppResult<Team> {
    TeamRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Team", id }))
}

fn require_owner_or_admin(auth: &AuthUser, team: &Team) -> AppResult<()> {
    if team.owner_id != auth.user_id && auth.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not the owner of this team".into(),
        )));
    }
    Ok(())
}

async fn require_member_or_admin(state: &AppState, auth: &AuthUser, team: &Team) -> AppResult<()> {
    if auth.role == ROLE_ADMIN || team.owner_id == auth.user_id {
        return Ok(());
    }
    let members = TeamRepo::list_members(&state.pool, team.id).await?;
    if members.iter().any(|m| m.user_id == auth.user_id) {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "Not a member of this team".into(),
    )))
}
