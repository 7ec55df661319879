//! Repository for the `teams` and `team_members` tables.

use sqlx::PgPool;
use steward_core::types::DbId;

use crate::models::team::{CreateTeam, Team, TeamMember, UpdateTeam};

/// Column list shared across `teams` queries.
const COLUMNS: &str = "id, name, description, owner_id, created_at, updated_at";

/// Column list for membership rows joined with user details.
const MEMBER_COLUMNS: &str =
    "tm.team_id, tm.user_id, u.username, u.email, tm.member_role, tm.added_at";

/// Provides CRUD operations for teams and team membership.
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a new team and add the owner as its first member.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateTeam,
    ) -> Result<Team, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO teams (name, description, owner_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let team = sqlx::query_as::<_, Team>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO team_members (team_id, user_id, member_role) VALUES ($1, $2, 'owner')",
        )
        .bind(team.id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(team)
    }

    /// Find a team by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List teams the given user belongs to, ordered by name.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!(
            "SELECT t.{} FROM teams t \
             JOIN team_members tm ON tm.team_id = t.id \
             WHERE tm.user_id = $1 \
             ORDER BY t.name ASC",
            COLUMNS.replace(", ", ", t.")
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List all teams, ordered by name (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams ORDER BY name ASC");
        sqlx::query_as::<_, Team>(&query).fetch_all(pool).await
    }

    /// Update a team. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTeam,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!(
            "UPDATE teams SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a team (memberships cascade). Returns `true` if removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a team's members joined with user details.
    pub async fn list_members(pool: &PgPool, team_id: DbId) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members tm \
             JOIN users u ON u.id = tm.user_id \
             WHERE tm.team_id = $1 \
             ORDER BY tm.added_at ASC"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(team_id)
            .fetch_all(pool)
            .await
    }

    /// Add a member to a team. The unique constraint rejects duplicates.
    pub async fn add_member(pool: &PgPool, team_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO team_members (team_id, user_id, member_role) VALUES ($1, $2, 'member')",
        )
        .bind(team_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a member from a team. Returns `true` if a row was removed.
    pub async fn remove_member(
        pool: &PgPool,
        team_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM team_members WHERE team_id = $1 AND user_id = $2 AND member_role <> 'owner'",
        )
        .bind(team_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
