//! Repository for the `referral_codes` and `referral_redemptions` tables.

use sqlx::PgPool;
use steward_core::types::{DbId, Timestamp};

use crate::models::referral::{ReferralCode, ReferralRedemption};

/// Column list shared across `referral_codes` queries.
const COLUMNS: &str = "id, owner_id, code, max_uses, used_count, expires_at, \
     is_active, created_at, updated_at";

/// Column list for `referral_redemptions` queries.
const REDEMPTION_COLUMNS: &str = "id, code_id, redeemed_by, redeemed_at";

/// Provides operations for referral codes and their redemptions.
pub struct ReferralRepo;

impl ReferralRepo {
    /// Insert a new code, returning the created row. The `code` string is
    /// generated by the caller; the unique constraint catches collisions.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        code: &str,
        max_uses: i32,
        expires_at: Option<Timestamp>,
    ) -> Result<ReferralCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO referral_codes (owner_id, code, max_uses, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReferralCode>(&query)
            .bind(owner_id)
            .bind(code)
            .bind(max_uses)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a referral code by its code string.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<ReferralCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM referral_codes WHERE code = $1");
        sqlx::query_as::<_, ReferralCode>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List codes owned by a user, most recently created first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<ReferralCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM referral_codes WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ReferralCode>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List all codes, most recently created first (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ReferralCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM referral_codes ORDER BY created_at DESC");
        sqlx::query_as::<_, ReferralCode>(&query)
            .fetch_all(pool)
            .await
    }

    /// Deactivate a code. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE referral_codes SET is_active = false, updated_at = NOW() \
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Redeem a code for a user.
    ///
    /// Atomically increments `used_count` while the code is active, under
    /// its use limit, and not expired, then records the redemption. Returns
    /// `false` when the code is not currently redeemable. A repeat
    /// redemption by the same user violates `uq_referral_redemptions_code_user`
    /// and surfaces as a conflict.
    pub async fn redeem(pool: &PgPool, code_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed = sqlx::query(
            "UPDATE referral_codes SET used_count = used_count + 1, updated_at = NOW() \
             WHERE id = $1 \
               AND is_active = true \
               AND used_count < max_uses \
               AND (expires_at IS NULL OR expires_at > NOW())",
        )
        .bind(code_id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("INSERT INTO referral_redemptions (code_id, redeemed_by) VALUES ($1, $2)")
            .bind(code_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// List redemptions of a code, most recent first.
    pub async fn list_redemptions(
        pool: &PgPool,
        code_id: DbId,
    ) -> Result<Vec<ReferralRedemption>, sqlx::Error> {
        let query = format!(
            "SELECT {REDEMPTION_COLUMNS} FROM referral_redemptions \
             WHERE code_id = $1 ORDER BY redeemed_at DESC"
        );
        sqlx::query_as::<_, ReferralRedemption>(&query)
            .bind(code_id)
            .fetch_all(pool)
            .await
    }
}
