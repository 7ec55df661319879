//! Handlers for referral codes and redemptions.
//!
//! Users create and list their own codes and redeem other users' codes at
//! `/referrals`; the platform-wide view and deactivation live under
//! `/admin/referrals`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use steward_core::error::CoreError;
use steward_core::referral::{generate_referral_code, DEFAULT_MAX_USES};
use steward_core::types::DbId;
use steward_db::models::referral::{CreateReferralCode, ReferralCode, ReferralRedemption};
use steward_db::repositories::ReferralRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts at generating a collision-free code before giving up. Collisions
/// are vanishingly rare at 10 alphanumeric characters; retrying covers them.
const CODE_GENERATION_ATTEMPTS: usize = 3;

/// Request body for `POST /referrals/redeem`.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub code: String,
}

// ---------------------------------------------------------------------------
// User surface
// ---------------------------------------------------------------------------

/// GET /api/v1/referrals
///
/// List the caller's own referral codes.
pub async fn list_own_codes(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ReferralCode>>>> {
    let codes = ReferralRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: codes }))
}

/// POST /api/v1/referrals
///
/// Create a new referral code for the caller. The code string is generated
/// server-side; callers only choose the use limit and expiry.
pub async fn create_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReferralCode>,
) -> AppResult<(StatusCode, Json<DataResponse<ReferralCode>>)> {
    let max_uses = input.max_uses.unwrap_or(DEFAULT_MAX_USES);
    if max_uses <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "max_uses must be positive".into(),
        )));
    }
    if matches!(input.expires_at, Some(at) if at <= chrono::Utc::now()) {
        return Err(AppError::Core(CoreError::Validation(
            "expires_at must be in the future".into(),
        )));
    }

    let mut last_err = None;
    for _ in 0..CODE_GENERATION_ATTEMPTS {
        let code = generate_referral_code();
        match ReferralRepo::create(&state.pool, auth.user_id, &code, max_uses, input.expires_at)
            .await
        {
            Ok(created) => {
                tracing::info!(
                    code_id = created.id,
                    user_id = auth.user_id,
                    "Referral code created"
                );
                return Ok((StatusCode::CREATED, Json(DataResponse { data: created })));
            }
            Err(err) if is_unique_violation(&err) => {
                last_err = Some(err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(AppError::InternalError(format!(
        "Could not generate a unique referral code: {}",
        last_err.map(|e| e.to_string()).unwrap_or_default()
    )))
}

/// POST /api/v1/referrals/redeem
///
/// Redeem a referral code. Fails when the code does not exist, belongs to
/// the caller, is inactive, expired, or exhausted, or when the caller has
/// already redeemed it.
pub async fn redeem_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RedeemRequest>,
) -> AppResult<Json<DataResponse<ReferralCode>>> {
    let code = ReferralRepo::find_by_code(&state.pool, &input.code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "ReferralCode",
                key: input.code.clone(),
            })
        })?;

    if code.owner_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot redeem your own referral code".into(),
        )));
    }

    // Repeat redemption by the same user surfaces as a 409 via the unique
    // constraint on (code_id, redeemed_by).
    let redeemed = ReferralRepo::redeem(&state.pool, code.id, auth.user_id).await?;
    if !redeemed {
        return Err(AppError::Core(CoreError::Validation(
            "Referral code is inactive, expired, or fully used".into(),
        )));
    }

    tracing::info!(code_id = code.id, user_id = auth.user_id, "Referral code redeemed");

    let refreshed = ReferralRepo::find_by_code(&state.pool, &input.code)
        .await?
        .unwrap_or(code);

    Ok(Json(DataResponse { data: refreshed }))
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/referrals
///
/// List every referral code on the platform.
pub async fn list_all_codes(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ReferralCode>>>> {
    let codes = ReferralRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: codes }))
}

/// GET /api/v1/admin/referrals/{id}/redemptions
///
/// List the redemptions of one code, most recent first.
pub async fn list_redemptions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ReferralRedemption>>>> {
    let redemptions = ReferralRepo::list_redemptions(&state.pool, id).await?;
    Ok(Json(DataResponse { data: redemptions }))
}

/// DELETE /api/v1/admin/referrals/{id}
///
/// Deactivate a referral code. Redemption history is kept.
pub async fn deactivate_code(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = ReferralRepo::deactivate(&state.pool, id).await?;
    if deactivated {
        tracing::info!(code_id = id, admin_id = admin.user_id, "Referral code deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ReferralCode",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
