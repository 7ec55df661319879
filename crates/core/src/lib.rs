//! Pure domain logic for the Steward admin console.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the API server, and any future CLI tooling alike.

pub mod error;
pub mod naming;
pub mod referral;
pub mod roles;
pub mod schema;
pub mod template;
pub mod types;
