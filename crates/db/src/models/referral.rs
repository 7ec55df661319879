//! Referral code and redemption models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use steward_core::types::{DbId, Timestamp};

/// A row from the `referral_codes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReferralCode {
    pub id: DbId,
    pub owner_id: DbId,
    /// Random alphanumeric code, unique per platform.
    pub code: String,
    pub max_uses: i32,
    pub used_count: i32,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `referral_redemptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReferralRedemption {
    pub id: DbId,
    pub code_id: DbId,
    pub redeemed_by: DbId,
    pub redeemed_at: Timestamp,
}

/// DTO for creating a new referral code. The code string itself is generated
/// server-side, never supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReferralCode {
    pub max_uses: Option<i32>,
    pub expires_at: Option<Timestamp>,
}
