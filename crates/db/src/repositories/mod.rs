//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod app_repo;
pub mod model_profile_repo;
pub mod referral_repo;
pub mod role_repo;
pub mod session_repo;
pub mod team_repo;
pub mod template_repo;
pub mod usage_repo;
pub mod user_repo;

pub use app_repo::AppRepo;
pub use model_profile_repo::ModelProfileRepo;
pub use referral_repo::ReferralRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use team_repo::TeamRepo;
pub use template_repo::TemplateRepo;
pub use usage_repo::UsageRepo;
pub use user_repo::UserRepo;
