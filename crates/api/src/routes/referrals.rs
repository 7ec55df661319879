//! Route definitions for referral codes and redemptions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::referrals;
use crate::state::AppState;

/// Routes mounted at `/referrals` -- the per-user surface.
///
/// ```text
/// GET  /        -> list_own_codes
/// POST /        -> create_code
/// POST /redeem  -> redeem_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(referrals::list_own_codes).post(referrals::create_code),
        )
        .route("/redeem", post(referrals::redeem_code))
}

/// Routes mounted at `/admin/referrals`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /                  -> list_all_codes
/// DELETE /{id}              -> deactivate_code
/// GET    /{id}/redemptions  -> list_redemptions
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(referrals::list_all_codes))
        .route("/{id}", axum::routing::delete(referrals::deactivate_code))
        .route("/{id}/redemptions", get(referrals::list_redemptions))
}
