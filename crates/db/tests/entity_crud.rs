//! Integration tests for the repository layer against a real database:
//! - User lifecycle (create, update, deactivate, login bookkeeping)
//! - Team membership (owner seeding, add/remove, owner protection)
//! - Model catalog CRUD and enabled-only listing
//! - Referral redemption limits and duplicate protection
//! - Usage ingest bucketing and aggregates

use chrono::NaiveDate;
use sqlx::PgPool;
use steward_db::models::model_profile::{CreateModelProfile, UpdateModelProfile};
use steward_db::models::team::CreateTeam;
use steward_db::models::usage::CreateUsageRecord;
use steward_db::models::user::{CreateUser, UpdateUser};
use steward_db::repositories::{
    ModelProfileRepo, ReferralRepo, RoleRepo, TeamRepo, UsageRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, username: &str) -> steward_db::models::user::User {
    let role = RoleRepo::find_by_name(pool, "operator")
        .await
        .expect("role lookup should succeed")
        .expect("operator role is seeded");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "$argon2id$fake".to_string(),
            role_id: role.id,
        },
    )
    .await
    .expect("user creation should succeed")
}

fn new_model(name: &str) -> CreateModelProfile {
    CreateModelProfile {
        name: name.to_string(),
        display_name: name.to_uppercase(),
        provider: "openai".to_string(),
        context_window: 128_000,
        input_price: 0.15,
        output_price: 0.6,
        capabilities: vec!["chat".to_string()],
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_user_crud_and_deactivation(pool: PgPool) {
    let user = create_user(&pool, "alice").await;
    assert!(user.is_active);
    assert_eq!(user.failed_login_count, 0);

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            username: None,
            email: Some("alice@corp.com".to_string()),
            role_id: None,
            is_active: None,
        },
    )
    .await
    .expect("update should succeed")
    .expect("user exists");
    assert_eq!(updated.email, "alice@corp.com");
    // Untouched fields keep their values.
    assert_eq!(updated.username, "alice");

    assert!(UserRepo::deactivate(&pool, user.id).await.unwrap());
    // Second deactivation is a no-op.
    assert!(!UserRepo::deactivate(&pool, user.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_username_is_rejected(pool: PgPool) {
    create_user(&pool, "bob").await;
    let role = RoleRepo::find_by_name(&pool, "viewer").await.unwrap().unwrap();
    let result = UserRepo::create(
        &pool,
        &CreateUser {
            username: "bob".to_string(),
            email: "other@test.com".to_string(),
            password_hash: "x".to_string(),
            role_id: role.id,
        },
    )
    .await;
    assert!(result.is_err(), "unique constraint must reject duplicate username");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_bookkeeping(pool: PgPool) {
    let user = create_user(&pool, "carol").await;

    UserRepo::increment_failed_login(&pool, user.id).await.unwrap();
    UserRepo::increment_failed_login(&pool, user.id).await.unwrap();
    let loaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(loaded.failed_login_count, 2);

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let loaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(loaded.failed_login_count, 0);
    assert!(loaded.last_login_at.is_some());
    assert!(loaded.locked_until.is_none());
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_team_owner_is_seeded_as_member(pool: PgPool) {
    let owner = create_user(&pool, "owner").await;
    let team = TeamRepo::create(
        &pool,
        owner.id,
        &CreateTeam {
            name: "Platform".to_string(),
            description: None,
        },
    )
    .await
    .expect("team creation should succeed");

    let members = TeamRepo::list_members(&pool, team.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, owner.id);
    assert_eq!(members[0].member_role, "owner");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_team_member_add_remove(pool: PgPool) {
    let owner = create_user(&pool, "lead").await;
    let member = create_user(&pool, "dev").await;
    let team = TeamRepo::create(
        &pool,
        owner.id,
        &CreateTeam {
            name: "Infra".to_string(),
            description: Some("infra team".to_string()),
        },
    )
    .await
    .unwrap();

    TeamRepo::add_member(&pool, team.id, member.id).await.unwrap();
    assert_eq!(TeamRepo::list_members(&pool, team.id).await.unwrap().len(), 2);

    // Duplicate membership hits uq_team_members_team_user.
    assert!(TeamRepo::add_member(&pool, team.id, member.id).await.is_err());

    assert!(TeamRepo::remove_member(&pool, team.id, member.id).await.unwrap());
    // The owner row cannot be removed through remove_member.
    assert!(!TeamRepo::remove_member(&pool, team.id, owner.id).await.unwrap());

    let teams = TeamRepo::list_for_user(&pool, owner.id).await.unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].name, "Infra");
}

// ---------------------------------------------------------------------------
// Model catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_model_catalog_crud(pool: PgPool) {
    let created = ModelProfileRepo::create(&pool, &new_model("gpt-4o-mini"))
        .await
        .expect("model creation should succeed");
    assert!(created.is_enabled);

    let updated = ModelProfileRepo::update(
        &pool,
        created.id,
        &UpdateModelProfile {
            display_name: None,
            provider: None,
            context_window: None,
            input_price: Some(0.3),
            output_price: None,
            is_enabled: Some(false),
            capabilities: None,
        },
    )
    .await
    .unwrap()
    .expect("model exists");
    assert_eq!(updated.input_price, 0.3);
    assert!(!updated.is_enabled);

    // Enabled-only listing hides the disabled entry.
    ModelProfileRepo::create(&pool, &new_model("claude-sonnet")).await.unwrap();
    let enabled = ModelProfileRepo::list(&pool, true).await.unwrap();
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].name, "claude-sonnet");
    let all = ModelProfileRepo::list(&pool, false).await.unwrap();
    assert_eq!(all.len(), 2);
}

// ---------------------------------------------------------------------------
// Referrals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_referral_redemption_limits(pool: PgPool) {
    let owner = create_user(&pool, "referrer").await;
    let friend = create_user(&pool, "friend").await;
    let other = create_user(&pool, "other").await;

    let code = ReferralRepo::create(&pool, owner.id, "ABC123XYZ0", 1, None)
        .await
        .expect("code creation should succeed");

    assert!(ReferralRepo::redeem(&pool, code.id, friend.id).await.unwrap());

    let reloaded = ReferralRepo::find_by_code(&pool, "ABC123XYZ0").await.unwrap().unwrap();
    assert_eq!(reloaded.used_count, 1);

    // max_uses = 1: further redemptions are refused.
    assert!(!ReferralRepo::redeem(&pool, code.id, other.id).await.unwrap());

    let redemptions = ReferralRepo::list_redemptions(&pool, code.id).await.unwrap();
    assert_eq!(redemptions.len(), 1);
    assert_eq!(redemptions[0].redeemed_by, friend.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_referral_double_redeem_same_user_conflicts(pool: PgPool) {
    let owner = create_user(&pool, "referrer2").await;
    let friend = create_user(&pool, "friend2").await;
    let code = ReferralRepo::create(&pool, owner.id, "DEF456UVW1", 5, None)
        .await
        .unwrap();

    assert!(ReferralRepo::redeem(&pool, code.id, friend.id).await.unwrap());
    // Second redemption by the same user violates the unique constraint.
    assert!(ReferralRepo::redeem(&pool, code.id, friend.id).await.is_err());

    // The failed attempt must not have consumed a use.
    let reloaded = ReferralRepo::find_by_code(&pool, "DEF456UVW1").await.unwrap().unwrap();
    assert_eq!(reloaded.used_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deactivated_referral_cannot_be_redeemed(pool: PgPool) {
    let owner = create_user(&pool, "referrer3").await;
    let friend = create_user(&pool, "friend3").await;
    let code = ReferralRepo::create(&pool, owner.id, "GHI789RST2", 5, None)
        .await
        .unwrap();

    assert!(ReferralRepo::deactivate(&pool, code.id).await.unwrap());
    assert!(!ReferralRepo::redeem(&pool, code.id, friend.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

fn day(s: &str) -> NaiveDate {
    s.parse().expect("valid date literal")
}

#[sqlx::test(migrations = "./migrations")]
async fn test_usage_ingest_accumulates_into_bucket(pool: PgPool) {
    let user = create_user(&pool, "consumer").await;
    let record = CreateUsageRecord {
        user_id: user.id,
        app_id: None,
        model_name: "gpt-4o-mini".to_string(),
        prompt_tokens: 100,
        completion_tokens: 50,
        request_count: None,
        recorded_on: Some(day("2026-08-01")),
    };

    UsageRepo::ingest(&pool, &record).await.unwrap();
    let merged = UsageRepo::ingest(&pool, &record).await.unwrap();

    // Same (user, app, model, day) bucket: totals accumulate in one row.
    assert_eq!(merged.prompt_tokens, 200);
    assert_eq!(merged.completion_tokens, 100);
    assert_eq!(merged.request_count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_usage_summary_and_series(pool: PgPool) {
    let user = create_user(&pool, "heavy").await;
    for (date, prompt) in [("2026-08-01", 100), ("2026-08-02", 300)] {
        UsageRepo::ingest(
            &pool,
            &CreateUsageRecord {
                user_id: user.id,
                app_id: None,
                model_name: "gpt-4o-mini".to_string(),
                prompt_tokens: prompt,
                completion_tokens: 10,
                request_count: Some(2),
                recorded_on: Some(day(date)),
            },
        )
        .await
        .unwrap();
    }

    let summary =
        UsageRepo::summary_for_user(&pool, user.id, day("2026-08-01"), day("2026-08-31"))
            .await
            .unwrap();
    assert_eq!(summary.prompt_tokens, 400);
    assert_eq!(summary.completion_tokens, 20);
    assert_eq!(summary.request_count, 4);

    // Range excluding the second day.
    let partial =
        UsageRepo::summary_for_user(&pool, user.id, day("2026-08-01"), day("2026-08-01"))
            .await
            .unwrap();
    assert_eq!(partial.prompt_tokens, 100);

    let series = UsageRepo::daily_series(&pool, day("2026-08-01"), day("2026-08-31"))
        .await
        .unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].day, day("2026-08-01"));
    assert_eq!(series[0].prompt_tokens, 100);
    assert_eq!(series[1].prompt_tokens, 300);

    let overview = UsageRepo::platform_overview(&pool).await.unwrap();
    assert_eq!(overview.total_users, 1);
    assert_eq!(overview.total_prompt_tokens, 400);
}
