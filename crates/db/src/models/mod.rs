//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod app;
pub mod model_profile;
pub mod referral;
pub mod role;
pub mod session;
pub mod team;
pub mod template;
pub mod usage;
pub mod user;
