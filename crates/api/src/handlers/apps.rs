//! Handlers for the `/apps` resource.
//!
//! An app is a deployed instance of a template: a slug, a name, and the
//! configuration values substituted into the template body. Users manage
//! their own apps; admins can see and manage everyone's.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use steward_core::error::CoreError;
use steward_core::naming::validate_slug;
use steward_core::roles::ROLE_ADMIN;
use steward_core::schema;
use steward_core::template;
use steward_core::types::DbId;
use steward_db::models::app::{App, CreateApp, UpdateApp};
use steward_db::repositories::{AppRepo, TemplateRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::templates::{merge_values, parse_schema};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for the rendered endpoint.
#[derive(Debug, Serialize)]
pub struct RenderedResponse {
    pub rendered: String,
    /// Marker paths left unresolved in the rendered output.
    pub unresolved: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/apps
///
/// List apps: admins see every app, everyone else sees their own.
pub async fn list_apps(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<App>>>> {
    let apps = if auth.role == ROLE_ADMIN {
        AppRepo::list_all(&state.pool).await?
    } else {
        AppRepo::list_for_owner(&state.pool, auth.user_id).await?
    };
    Ok(Json(DataResponse { data: apps }))
}

/// POST /api/v1/apps
///
/// Deploy a new app from a template. Submitted configuration values are
/// merged over the template schema's defaults and validated against the
/// schema; omitting them deploys with the defaults alone.
pub async fn create_app(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateApp>,
) -> AppResult<(StatusCode, Json<DataResponse<App>>)> {
    validate_slug(&input.slug).map_err(AppError::Core)?;

    let template = TemplateRepo::find_by_id(&state.pool, input.template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: input.template_id,
        }))?;

    if !template.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Template '{}' is inactive",
            template.slug
        ))));
    }

    let parsed = parse_schema(&template.config_schema)?;
    let mut values = schema::default_values(&parsed);
    if let Some(submitted) = input.config_values.clone() {
        merge_values(&mut values, submitted);
    }
    schema::validate_values(&parsed, &values).map_err(AppError::Core)?;

    let app = AppRepo::create(&state.pool, auth.user_id, &input, &values).await?;
    tracing::info!(
        app_id = app.id,
        template_id = template.id,
        user_id = auth.user_id,
        "App created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: app })))
}

/// GET /api/v1/apps/{id}
pub async fn get_app(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<App>>> {
    let app = find_app_authorized(&state, &auth, id).await?;
    Ok(Json(DataResponse { data: app }))
}

/// PUT /api/v1/apps/{id}
///
/// Update an app. Changed configuration values are validated against the
/// owning template's schema.
pub async fn update_app(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateApp>,
) -> AppResult<Json<DataResponse<App>>> {
    let app = find_app_authorized(&state, &auth, id).await?;

    if let Some(submitted) = &input.config_values {
        let template = TemplateRepo::find_by_id(&state.pool, app.template_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Template",
                id: app.template_id,
            }))?;
        let parsed = parse_schema(&template.config_schema)?;
        schema::validate_values(&parsed, submitted).map_err(AppError::Core)?;
    }

    let updated = AppRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "App", id }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/apps/{id}
pub async fn delete_app(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_app_authorized(&state, &auth, id).await?;

    AppRepo::delete(&state.pool, id).await?;
    tracing::info!(app_id = id, user_id = auth.user_id, "App deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/apps/{id}/rendered
///
/// Render the app's body (custom body when set, otherwise the template
/// body) against its stored configuration values.
pub async fn get_rendered_app(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RenderedResponse>>> {
    let app = find_app_authorized(&state, &auth, id).await?;

    let template = TemplateRepo::find_by_id(&state.pool, app.template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id: app.template_id,
        }))?;

    let body = app.custom_body.as_deref().unwrap_or(&template.body);
    let rendered = template::render(body, &app.config_values);
    let unresolved = template::unresolved_paths(body, &app.config_values);

    Ok(Json(DataResponse {
        data: RenderedResponse {
            rendered,
            unresolved,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch an app, requiring the caller to be its owner or an admin.
async fn find_app_authorized(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<App> {
    let app = AppRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "App", id }))?;

    if app.owner_id != auth.user_id && auth.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not the owner of this app".into(),
        )));
    }

    Ok(app)
}
