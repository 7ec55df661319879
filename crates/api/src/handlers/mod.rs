//! HTTP handler implementations, one module per resource.

pub mod admin;
pub mod apps;
pub mod auth;
pub mod models;
pub mod referrals;
pub mod stats;
pub mod teams;
pub mod templates;
