//! Integration tests for template and app persistence:
//! - Template CRUD with immutable slug and soft activation flag
//! - App creation against a template, update, and template reference counts

use sqlx::PgPool;
use steward_db::models::app::{CreateApp, UpdateApp};
use steward_db::models::template::{CreateTemplate, UpdateTemplate};
use steward_db::models::user::CreateUser;
use steward_db::repositories::{AppRepo, RoleRepo, TemplateRepo, UserRepo};

fn new_template(slug: &str) -> CreateTemplate {
    CreateTemplate {
        slug: slug.to_string(),
        name: "Chat Widget".to_string(),
        description: Some("Embeddable chat".to_string()),
        body: "<h1>{{title}}</h1>".to_string(),
        config_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "default": "Untitled" }
            }
        }),
        ui_hints: None,
        tags: vec!["chat".to_string()],
        icon_url: None,
        dark_icon_url: None,
    }
}

async fn create_owner(pool: &PgPool) -> steward_db::models::user::User {
    let role = RoleRepo::find_by_name(pool, "admin").await.unwrap().unwrap();
    UserRepo::create(
        pool,
        &CreateUser {
            username: "owner".to_string(),
            email: "owner@test.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role_id: role.id,
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_template_crud(pool: PgPool) {
    let created = TemplateRepo::create(&pool, &new_template("chat-widget"))
        .await
        .expect("template creation should succeed");
    assert!(created.is_active);
    assert_eq!(created.slug, "chat-widget");

    let updated = TemplateRepo::update(
        &pool,
        "chat-widget",
        &UpdateTemplate {
            name: Some("Chat Widget v2".to_string()),
            description: None,
            body: Some("<h1>{{title}}</h1><p>{{tagline}}</p>".to_string()),
            config_schema: None,
            ui_hints: None,
            tags: None,
            icon_url: None,
            dark_icon_url: None,
        },
    )
    .await
    .unwrap()
    .expect("template exists");
    assert_eq!(updated.name, "Chat Widget v2");
    // Slug and untouched fields survive the partial update.
    assert_eq!(updated.slug, "chat-widget");
    assert_eq!(updated.description.as_deref(), Some("Embeddable chat"));

    assert!(TemplateRepo::set_active(&pool, "chat-widget", false).await.unwrap());
    // Re-applying the same flag is a no-op.
    assert!(!TemplateRepo::set_active(&pool, "chat-widget", false).await.unwrap());

    // Inactive templates are hidden from the default listing.
    assert!(TemplateRepo::list(&pool, false).await.unwrap().is_empty());
    assert_eq!(TemplateRepo::list(&pool, true).await.unwrap().len(), 1);

    assert!(TemplateRepo::delete(&pool, "chat-widget").await.unwrap());
    assert!(TemplateRepo::find_by_slug(&pool, "chat-widget").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_slug_is_rejected(pool: PgPool) {
    TemplateRepo::create(&pool, &new_template("dup")).await.unwrap();
    assert!(TemplateRepo::create(&pool, &new_template("dup")).await.is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_app_lifecycle(pool: PgPool) {
    let owner = create_owner(&pool).await;
    let template = TemplateRepo::create(&pool, &new_template("base")).await.unwrap();

    let values = serde_json::json!({ "title": "Support Bot" });
    let app = AppRepo::create(
        &pool,
        owner.id,
        &CreateApp {
            template_id: template.id,
            slug: "support-bot".to_string(),
            name: "Support Bot".to_string(),
            config_values: None,
            custom_body: None,
        },
        &values,
    )
    .await
    .expect("app creation should succeed");
    assert_eq!(app.config_values, values);
    assert_eq!(app.owner_id, owner.id);

    let updated = AppRepo::update(
        &pool,
        app.id,
        &UpdateApp {
            name: None,
            config_values: Some(serde_json::json!({ "title": "Helpdesk" })),
            custom_body: Some("<h2>{{title}}</h2>".to_string()),
            is_active: None,
        },
    )
    .await
    .unwrap()
    .expect("app exists");
    assert_eq!(updated.config_values["title"], "Helpdesk");
    assert_eq!(updated.custom_body.as_deref(), Some("<h2>{{title}}</h2>"));

    assert_eq!(AppRepo::count_for_template(&pool, template.id).await.unwrap(), 1);
    assert_eq!(AppRepo::list_for_owner(&pool, owner.id).await.unwrap().len(), 1);

    assert!(AppRepo::delete(&pool, app.id).await.unwrap());
    assert_eq!(AppRepo::count_for_template(&pool, template.id).await.unwrap(), 0);
}
