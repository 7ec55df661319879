//! Response envelope shared by all resource handlers.
//!
//! Every successful API response wraps its payload in `{ "data": ... }` so
//! clients can distinguish results from the `{ "error", "code" }` shape that
//! [`crate::error::AppError`] produces. Handlers return [`DataResponse`]
//! rather than building the envelope with `serde_json::json!` by hand.

use serde::Serialize;

/// The `{ "data": T }` success envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: templates }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
