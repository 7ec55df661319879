pub mod admin;
pub mod apps;
pub mod auth;
pub mod health;
pub mod models;
pub mod referrals;
pub mod stats;
pub mod teams;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/refresh                            refresh (public)
/// /auth/logout                             logout (requires auth)
///
/// /admin/users                             list, create (admin only)
/// /admin/users/{id}                        get, update, deactivate
/// /admin/users/{id}/reset-password         reset password (POST)
///
/// /admin/models                            list, create (admin only)
/// /admin/models/{id}                       get, update, delete
///
/// /admin/referrals                         list all codes (admin only)
/// /admin/referrals/{id}                    deactivate (DELETE)
/// /admin/referrals/{id}/redemptions        redemption history (GET)
///
/// /admin/stats/overview                    platform counts (admin only)
/// /admin/stats/usage                       per-day usage series
/// /admin/stats/models                      per-model usage breakdown
///
/// /templates                               list, create
/// /templates/{slug}                        get, update, delete
/// /templates/{slug}/activate               activate (POST)
/// /templates/{slug}/deactivate             deactivate (POST)
/// /templates/{slug}/preview                render preview (POST)
/// /templates/{slug}/schema                 schema + defaults + widgets (GET)
///
/// /apps                                    list, create
/// /apps/{id}                               get, update, delete
/// /apps/{id}/rendered                      rendered body (GET)
///
/// /models                                  enabled catalog entries (GET)
///
/// /referrals                               own codes: list, create
/// /referrals/redeem                        redeem a code (POST)
///
/// /teams                                   list, create
/// /teams/{id}                              get, update, delete
/// /teams/{id}/members                      list, add
/// /teams/{id}/members/{user_id}            remove (DELETE)
///
/// /usage                                   ingest record (POST, operator+)
/// /usage/summary                           own usage summary (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/admin/models", models::admin_router())
        .nest("/admin/referrals", referrals::admin_router())
        .nest("/admin/stats", stats::admin_router())
        .nest("/templates", templates::router())
        .nest("/apps", apps::router())
        .nest("/models", models::catalog_router())
        .nest("/referrals", referrals::router())
        .nest("/teams", teams::router())
        .nest("/usage", stats::usage_router())
}
