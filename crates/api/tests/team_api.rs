//! HTTP-level integration tests for teams and membership.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth};
use sqlx::PgPool;
use steward_api::auth::password::hash_password;
use steward_db::models::user::CreateUser;
use steward_db::repositories::UserRepo;

const ROLE_ID_VIEWER: i64 = 3;

/// Create a user and log in, returning (user id, access token).
async fn login_as(pool: &PgPool, username: &str, role_id: i64) -> (i64, String) {
    let password = "test_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let user = UserRepo::create(
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
    (user.id, json["access_token"].as_str().unwrap().to_string())
}

/// Creating a team seeds the creator as its owner member.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_team_seeds_owner(pool: PgPool) {
    let (user_id, token) = login_as(&pool, "founder", ROLE_ID_VIEWER).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": "Platform Crew" });
    let response = post_json_auth(app, "/api/v1/teams", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let team_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, &format!("/api/v1/teams/{team_id}/members"), &token).await,
    )
    .await;
    let members = json["data"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["user_id"], user_id);
    assert_eq!(members[0]["member_role"], "owner");
}

/// Members can be added and removed; the owner cannot be removed.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_membership_lifecycle(pool: PgPool) {
    let (owner_id, owner_token) = login_as(&pool, "founder", ROLE_ID_VIEWER).await;
    let (member_id, _member_token) = login_as(&pool, "joiner", ROLE_ID_VIEWER).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": "Core Team" });
    let response = post_json_auth(app, "/api/v1/teams", body, &owner_token).await;
    let team_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "user_id": member_id });
    let response =
        post_json_auth(app, &format!("/api/v1/teams/{team_id}/members"), body, &owner_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The owner's membership row is protected.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/teams/{team_id}/members/{owner_id}"),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/teams/{team_id}/members/{member_id}"),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

/// Non-members cannot read a team; non-owners cannot mutate it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_team_access_control(pool: PgPool) {
    let (_owner_id, owner_token) = login_as(&pool, "founder", ROLE_ID_VIEWER).await;
    let (member_id, member_token) = login_as(&pool, "joiner", ROLE_ID_VIEWER).await;
    let (_outsider_id, outsider_token) = login_as(&pool, "outsider", ROLE_ID_VIEWER).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": "Private Team" });
    let response = post_json_auth(app, "/api/v1/teams", body, &owner_token).await;
    let team_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "user_id": member_id });
    post_json_auth(app, &format!("/api/v1/teams/{team_id}/members"), body, &owner_token).await;

    // Outsider cannot read.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/teams/{team_id}"), &outsider_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Member reads but cannot delete.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/teams/{team_id}"), &member_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/teams/{team_id}"), &member_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
