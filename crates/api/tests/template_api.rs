//! HTTP-level integration tests for templates, previews, schemas, and apps.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth};
use sqlx::PgPool;
use steward_api::auth::password::hash_password;
use steward_db::models::user::CreateUser;
use steward_db::repositories::UserRepo;

const ROLE_ID_ADMIN: i64 = 1;
const ROLE_ID_OPERATOR: i64 = 2;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a user and log in, returning the access token.
async fn login_as(pool: &PgPool, username: &str, role_id: i64) -> String {
    let password = "test_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hashed,
            role_id,
        },
    )
    .await
    .expect("user creation should succeed");

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// A landing-page template with a nested schema and declared defaults.
fn landing_page_template() -> serde_json::Value {
    serde_json::json!({
        "slug": "landing-page",
        "name": "Landing Page",
        "description": "Simple hero section",
        "body": "<h1>{{title}}</h1><p>{{hero.text}}</p>",
        "config_schema": {
            "type": "object",
            "properties": {
                "title": { "type": "string", "title": "Page Title", "default": "Welcome" },
                "hero": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string" }
                    }
                }
            }
        },
        "tags": ["marketing"],
    })
}

/// Create the landing-page template through the API.
async fn create_landing_page(pool: &PgPool, token: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/templates", landing_page_template(), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Template CRUD
// ---------------------------------------------------------------------------

/// Create then fetch a template by slug.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_template_create_and_get(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    create_landing_page(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/templates/landing-page", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "landing-page");
    assert_eq!(json["data"]["name"], "Landing Page");
    assert_eq!(json["data"]["is_active"], true);
    assert_eq!(json["data"]["tags"][0], "marketing");
}

/// Invalid slugs are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_template_invalid_slug(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;

    let mut body = landing_page_template();
    body["slug"] = serde_json::json!("Not A Slug!");

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/templates", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A config schema that does not parse is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_template_invalid_schema(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;

    let mut body = landing_page_template();
    body["config_schema"] = serde_json::json!({ "type": "wibble" });

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/templates", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Deactivated templates disappear from the default list but stay fetchable.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_template_deactivate_hides_from_list(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    create_landing_page(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/templates/landing-page/deactivate",
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/templates", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, "/api/v1/templates?include_inactive=true", &token).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

/// Deleting a template with deployed apps is refused with 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_template_delete_blocked_by_apps(pool: PgPool) {
    let token = login_as(&pool, "admin1", ROLE_ID_ADMIN).await;
    let created = create_landing_page(&pool, &token).await;
    let template_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "template_id": template_id,
        "slug": "my-landing",
        "name": "My Landing",
    });
    let response = post_json_auth(app, "/api/v1/apps", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, "/api/v1/templates/landing-page", &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// Preview renders submitted values merged over schema defaults.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_preview_merges_defaults(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    create_landing_page(&pool, &token).await;

    // Only hero.text submitted; title falls back to its default.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "values": { "hero": { "text": "Hello" } } });
    let response = post_json_auth(
        app,
        "/api/v1/templates/landing-page/preview",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["rendered"], "<h1>Welcome</h1><p>Hello</p>");
    assert_eq!(json["data"]["unresolved"].as_array().unwrap().len(), 0);
}

/// Markers without a binding stay in the output verbatim and are reported.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_preview_reports_unresolved_markers(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    create_landing_page(&pool, &token).await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "values": { "title": "Hi" },
        "body": "<h1>{{title}}</h1>{{missing.path}}",
    });
    let response = post_json_auth(
        app,
        "/api/v1/templates/landing-page/preview",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["rendered"], "<h1>Hi</h1>{{missing.path}}");
    assert_eq!(json["data"]["unresolved"][0], "missing.path");
}

/// Non-marker brace text is passed through untouched.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_preview_leaves_non_marker_braces(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    create_landing_page(&pool, &token).await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "values": {},
        "body": "{{ }} {{1+1}} {{unclosed",
    });
    let response = post_json_auth(
        app,
        "/api/v1/templates/landing-page/preview",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["rendered"], "{{ }} {{1+1}} {{unclosed");
    assert_eq!(json["data"]["unresolved"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Schema endpoint
// ---------------------------------------------------------------------------

/// The schema endpoint returns the document plus derived defaults and widgets.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_schema_endpoint(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    create_landing_page(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/templates/landing-page/schema", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["defaults"]["title"], "Welcome");
    assert_eq!(json["data"]["defaults"]["hero"]["text"], "");

    let widgets = json["data"]["widgets"].as_array().unwrap();
    assert_eq!(widgets.len(), 2);

    // BTreeMap ordering: "hero" sorts before "title".
    assert_eq!(widgets[0]["path"], "hero");
    assert_eq!(widgets[0]["control"], "group");
    assert_eq!(widgets[0]["children"][0]["path"], "hero.text");
    assert_eq!(widgets[0]["children"][0]["control"], "text");
    assert_eq!(widgets[1]["path"], "title");
    assert_eq!(widgets[1]["label"], "Page Title");
}

// ---------------------------------------------------------------------------
// Apps
// ---------------------------------------------------------------------------

/// Deploying with no values uses the schema defaults; the rendered endpoint
/// substitutes them into the template body.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_app_deploy_and_render(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    let created = create_landing_page(&pool, &token).await;
    let template_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "template_id": template_id,
        "slug": "spring-launch",
        "name": "Spring Launch",
        "config_values": { "hero": { "text": "Now live" } },
    });
    let response = post_json_auth(app, "/api/v1/apps", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let app_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["config_values"]["title"], "Welcome");

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/apps/{app_id}/rendered"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["rendered"], "<h1>Welcome</h1><p>Now live</p>");
}

/// Values that fail schema validation are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_app_invalid_values_rejected(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    let created = create_landing_page(&pool, &token).await;
    let template_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "template_id": template_id,
        "slug": "bad-values",
        "name": "Bad Values",
        "config_values": { "title": 7 },
    });
    let response = post_json_auth(app, "/api/v1/apps", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A custom body overrides the template body at render time.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_app_custom_body(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    let created = create_landing_page(&pool, &token).await;
    let template_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "template_id": template_id,
        "slug": "custom",
        "name": "Custom",
        "custom_body": "Only: {{title}}",
    });
    let response = post_json_auth(app, "/api/v1/apps", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let app_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, &format!("/api/v1/apps/{app_id}/rendered"), &token).await,
    )
    .await;
    assert_eq!(json["data"]["rendered"], "Only: Welcome");
}

/// Owners are isolated: another user cannot read someone else's app.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_app_owner_isolation(pool: PgPool) {
    let owner_token = login_as(&pool, "owner", ROLE_ID_OPERATOR).await;
    let other_token = login_as(&pool, "other", ROLE_ID_OPERATOR).await;

    let created = create_landing_page(&pool, &owner_token).await;
    let template_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "template_id": template_id,
        "slug": "private",
        "name": "Private",
    });
    let response = post_json_auth(app, "/api/v1/apps", body, &owner_token).await;
    let app_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/apps/{app_id}"), &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// App updates with changed values are re-validated against the schema.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_app_update_revalidates(pool: PgPool) {
    let token = login_as(&pool, "op", ROLE_ID_OPERATOR).await;
    let created = create_landing_page(&pool, &token).await;
    let template_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "template_id": template_id,
        "slug": "editable",
        "name": "Editable",
    });
    let response = post_json_auth(app, "/api/v1/apps", body, &token).await;
    let app_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "config_values": { "unknown_key": true } });
    let response = put_json_auth(app, &format!("/api/v1/apps/{app_id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "config_values": { "title": "Edited", "hero": { "text": "x" } }
    });
    let response = put_json_auth(app, &format!("/api/v1/apps/{app_id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["config_values"]["title"], "Edited");
}
