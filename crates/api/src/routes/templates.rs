//! Route definitions for the `/templates` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/templates`.
///
/// Reads require authentication; mutations require operator or above
/// (enforced by handler extractors).
///
/// ```text
/// GET    /                    -> list_templates
/// POST   /                    -> create_template
/// GET    /{slug}              -> get_template
/// PUT    /{slug}              -> update_template
/// DELETE /{slug}              -> delete_template (admin)
/// POST   /{slug}/activate     -> activate_template
/// POST   /{slug}/deactivate   -> deactivate_template
/// POST   /{slug}/preview      -> preview_template
/// GET    /{slug}/schema       -> get_template_schema
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/{slug}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/{slug}/activate", post(templates::activate_template))
        .route("/{slug}/deactivate", post(templates::deactivate_template))
        .route("/{slug}/preview", post(templates::preview_template))
        .route("/{slug}/schema", get(templates::get_template_schema))
}
