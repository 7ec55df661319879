//! Referral code generation.
//!
//! Codes are short random alphanumeric strings handed to users to share.
//! Uniqueness is enforced by the database; the repository retries on the
//! (very unlikely) collision.

use rand::Rng;

/// Length of a generated referral code.
pub const CODE_LENGTH: usize = 10;

/// Default maximum number of redemptions for a new code.
pub const DEFAULT_MAX_USES: i32 = 10;

/// Generate a random alphanumeric referral code of [`CODE_LENGTH`] characters.
pub fn generate_referral_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}
