//! Route definitions for the `/teams` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::teams;
use crate::state::AppState;

/// Routes mounted at `/teams`.
///
/// All routes require authentication; owner checks happen in the handlers
/// (admins bypass them).
///
/// ```text
/// GET    /                        -> list_teams
/// POST   /                        -> create_team
/// GET    /{id}                    -> get_team
/// PUT    /{id}                    -> update_team
/// DELETE /{id}                    -> delete_team
/// GET    /{id}/members            -> list_members
/// POST   /{id}/members            -> add_member
/// DELETE /{id}/members/{user_id}  -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::list_teams).post(teams::create_team))
        .route(
            "/{id}",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        .route(
            "/{id}/members",
            get(teams::list_members).post(teams::add_member),
        )
        .route("/{id}/members/{user_id}", delete(teams::remove_member))
}
