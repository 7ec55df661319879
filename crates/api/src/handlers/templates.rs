//! Handlers for the `/templates` resource.
//!
//! Templates are the admin-authored blueprints apps are deployed from: a
//! body with `{{dotted.path}}` markers plus a configuration schema. Reads
//! require authentication; mutations require the `operator` role or above.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use steward_core::error::CoreError;
use steward_core::naming::validate_slug;
use steward_core::schema::{self, FieldSchema, FieldWidget};
use steward_core::template;
use steward_db::models::template::{CreateTemplate, Template, UpdateTemplate};
use steward_db::repositories::{AppRepo, TemplateRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireOperator};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /templates/{slug}/preview`.
///
/// Both fields are optional: omitted `values` previews against the schema
/// defaults alone, and `body` overrides the stored template body so the
/// editor can preview unsaved edits.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub values: Option<Value>,
    pub body: Option<String>,
}

/// Response body for the preview endpoint.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub rendered: String,
    /// Marker paths left unresolved in the rendered output.
    pub unresolved: Vec<String>,
}

/// Response body for the schema endpoint: the stored schema document plus
/// the derived defaults and form widgets.
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub schema: FieldSchema,
    pub defaults: Value,
    pub widgets: Vec<FieldWidget>,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/templates
///
/// List templates. Inactive templates are hidden unless
/// `?include_inactive=true` is passed.
pub async fn list_templates(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Template>>>> {
    let templates = TemplateRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/templates
///
/// Create a new template. The slug must be kebab-case and the configuration
/// schema must parse as a valid schema document.
pub async fn create_template(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<Template>>)> {
    validate_slug(&input.slug).map_err(AppError::Core)?;
    parse_schema(&input.config_schema)?;

    let created = TemplateRepo::create(&state.pool, &input).await?;
    tracing::info!(
        template_id = created.id,
        slug = %created.slug,
        user_id = operator.user_id,
        "Template created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/templates/{slug}
pub async fn get_template(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Template>>> {
    let template = find_template(&state, &slug).await?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/templates/{slug}
///
/// Update template fields. The slug is immutable; a changed schema must
/// still parse as a valid schema document.
pub async fn update_template(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<Json<DataResponse<Template>>> {
    if let Some(schema_doc) = &input.config_schema {
        parse_schema(schema_doc)?;
    }

    let updated = TemplateRepo::update(&state.pool, &slug, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Template",
                key: slug.clone(),
            })
        })?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/templates/{slug}
///
/// Hard-delete a template. Refused with 409 while deployed apps still
/// reference it; deactivate instead to retire a template in use.
pub async fn delete_template(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let template = find_template(&state, &slug).await?;

    let app_count = AppRepo::count_for_template(&state.pool, template.id).await?;
    if app_count > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Template '{slug}' is referenced by {app_count} app(s)"
        ))));
    }

    TemplateRepo::delete(&state.pool, &slug).await?;
    tracing::info!(%slug, admin_id = admin.user_id, "Template deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/{slug}/activate
pub async fn activate_template(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    set_active(&state, &slug, true).await
}

/// POST /api/v1/templates/{slug}/deactivate
pub async fn deactivate_template(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    set_active(&state, &slug, false).await
}

// ---------------------------------------------------------------------------
// Preview and schema
// ---------------------------------------------------------------------------

/// POST /api/v1/templates/{slug}/preview
///
/// Render the template against the submitted values merged over the schema
/// defaults, without persisting anything. Unresolved markers stay in the
/// output as literal text and are also listed separately.
pub async fn preview_template(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<PreviewRequest>,
) -> AppResult<Json<DataResponse<PreviewResponse>>> {
    let template = find_template(&state, &slug).await?;
    let schema = parse_schema(&template.config_schema)?;

    let mut values = schema::default_values(&schema);
    if let Some(submitted) = input.values {
        merge_values(&mut values, submitted);
    }

    let body = input.body.as_deref().unwrap_or(&template.body);
    let rendered = template::render(body, &values);
    let unresolved = template::unresolved_paths(body, &values);

    Ok(Json(DataResponse {
        data: PreviewResponse {
            rendered,
            unresolved,
        },
    }))
}

/// GET /api/v1/templates/{slug}/schema
///
/// Return the template's schema document together with its derived default
/// values and form widget descriptors.
pub async fn get_template_schema(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<SchemaResponse>>> {
    let template = find_template(&state, &slug).await?;
    let schema = parse_schema(&template.config_schema)?;

    let defaults = schema::default_values(&schema);
    let widgets = schema::widgets(&schema);

    Ok(Json(DataResponse {
        data: SchemaResponse {
            schema,
            defaults,
            widgets,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_template(state: &AppState, slug: &str) -> AppResult<Template> {
    TemplateRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Template",
                key: slug.to_string(),
            })
        })
}

async fn set_active(state: &AppState, slug: &str, active: bool) -> AppResult<StatusCode> {
    let updated = TemplateRepo::set_active(&state.pool, slug, active).await?;
    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFoundKey {
            entity: "Template",
            key: slug.to_string(),
        }))
    }
}

/// Parse a stored schema document, mapping parse failures to a 400.
pub(crate) fn parse_schema(doc: &Value) -> AppResult<FieldSchema> {
    serde_json::from_value(doc.clone())
        .map_err(|e| AppError::Core(CoreError::Validation(format!("Invalid config schema: {e}"))))
}

/// Merge submitted values over defaults: submitted object keys override the
/// same key in the defaults, recursing into nested objects; any non-object
/// replaces the default wholesale.
pub(crate) fn merge_values(base: &mut Value, submitted: Value) {
    match (base, submitted) {
        (Value::Object(base_map), Value::Object(submitted_map)) => {
            for (key, value) in submitted_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base_slot, submitted) => *base_slot = submitted,
    }
}
