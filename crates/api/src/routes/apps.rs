//! Route definitions for the `/apps` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::apps;
use crate::state::AppState;

/// Routes mounted at `/apps`.
///
/// All routes require authentication; ownership checks happen in the
/// handlers (admins bypass them).
///
/// ```text
/// GET    /              -> list_apps
/// POST   /              -> create_app
/// GET    /{id}          -> get_app
/// PUT    /{id}          -> update_app
/// DELETE /{id}          -> delete_app
/// GET    /{id}/rendered -> get_rendered_app
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(apps::list_apps).post(apps::create_app))
        .route(
            "/{id}",
            get(apps::get_app)
                .put(apps::update_app)
                .delete(apps::delete_app),
        )
        .route("/{id}/rendered", get(apps::get_rendered_app))
}
