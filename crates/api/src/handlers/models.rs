//! Handlers for the model catalog.
//!
//! The catalog has two surfaces: a public read at `/models` listing enabled
//! entries for any authenticated user, and an admin CRUD at `/admin/models`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use steward_core::error::CoreError;
use steward_core::types::DbId;
use steward_db::models::model_profile::{CreateModelProfile, ModelProfile, UpdateModelProfile};
use steward_db::repositories::ModelProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Public surface
// ---------------------------------------------------------------------------

/// GET /api/v1/models
///
/// List enabled catalog entries. This is what app builders pick from;
/// disabled models never appear here.
pub async fn list_enabled_models(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ModelProfile>>>> {
    let models = ModelProfileRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse { data: models }))
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/models
///
/// List all catalog entries. Disabled entries are hidden unless
/// `?include_inactive=true` is passed.
pub async fn list_models(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<ModelProfile>>>> {
    let models = ModelProfileRepo::list(&state.pool, !params.include_inactive).await?;
    Ok(Json(DataResponse { data: models }))
}

/// POST /api/v1/admin/models
pub async fn create_model(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateModelProfile>,
) -> AppResult<(StatusCode, Json<DataResponse<ModelProfile>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Model name must not be empty".into(),
        )));
    }
    if input.context_window <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Context window must be positive".into(),
        )));
    }
    if input.input_price < 0.0 || input.output_price < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Prices must not be negative".into(),
        )));
    }

    let model = ModelProfileRepo::create(&state.pool, &input).await?;
    tracing::info!(
        model_id = model.id,
        name = %model.name,
        admin_id = admin.user_id,
        "Model catalog entry created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: model })))
}

/// GET /api/v1/admin/models/{id}
pub async fn get_model(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ModelProfile>>> {
    let model = ModelProfileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ModelProfile",
            id,
        }))?;

    Ok(Json(DataResponse { data: model }))
}

/// PUT /api/v1/admin/models/{id}
pub async fn update_model(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateModelProfile>,
) -> AppResult<Json<DataResponse<ModelProfile>>> {
    if matches!(input.context_window, Some(cw) if cw <= 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Context window must be positive".into(),
        )));
    }

    let model = ModelProfileRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ModelProfile",
            id,
        }))?;

    Ok(Json(DataResponse { data: model }))
}

/// DELETE /api/v1/admin/models/{id}
pub async fn delete_model(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ModelProfileRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(model_id = id, admin_id = admin.user_id, "Model catalog entry deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ModelProfile",
            id,
        }))
    }
}
