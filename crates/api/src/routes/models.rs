//! Route definitions for the model catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::models;
use crate::state::AppState;

/// Routes mounted at `/models` -- the public catalog surface.
///
/// ```text
/// GET / -> list_enabled_models
/// ```
pub fn catalog_router() -> Router<AppState> {
    Router::new().route("/", get(models::list_enabled_models))
}

/// Routes mounted at `/admin/models`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /     -> list_models
/// POST   /     -> create_model
/// GET    /{id} -> get_model
/// PUT    /{id} -> update_model
/// DELETE /{id} -> delete_model
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(models::list_models).post(models::create_model))
        .route(
            "/{id}",
            get(models::get_model)
                .put(models::update_model)
                .delete(models::delete_model),
        )
}
