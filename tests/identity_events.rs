use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use docspace::app::domain::{OrganizationRole, ProjectRole};

mod common;

use crate::common::*;

const SECRET: &str = "test-webhook-secret";

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let pool = common::test_pool().await;
    let app = common::test_router(pool);

    let event = json!({
        "type": "user.created",
        "external_ref": "idp|alice",
        "email": "alice@example.com",
        "display_name": "Alice"
    });
    let response = app
        .oneshot(webhook_request(event, "not-the-secret"))
        .await
        .unwrap();
    assert_eq!(response.status(), http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_event_is_idempotent() {
    let pool = common::test_pool().await;
    let org = seed_organization(&pool, "acme").await;
    let app = common::test_router(pool.clone());

    let event = json!({
        "type": "user.created",
        "external_ref": "idp|alice",
        "email": "alice@example.com",
        "display_name": "Alice",
        "organization_id": org
    });

    let first = app
        .clone()
        .oneshot(webhook_request(event.clone(), SECRET))
        .await
        .unwrap();
    assert_eq!(first.status(), http::StatusCode::OK);
    let body = first.into_body().collect().await.unwrap().to_bytes();
    let outcome: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(outcome["created"], true);

    // Redelivery of the same event creates nothing.
    let second = app
        .oneshot(webhook_request(event, SECRET))
        .await
        .unwrap();
    assert_eq!(second.status(), http::StatusCode::OK);
    let body = second.into_body().collect().await.unwrap().to_bytes();
    let outcome: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(outcome["created"], false);

    assert_eq!(count_users_with_ref(&pool, "idp|alice").await, 1);

    // Provisioned users start least privileged.
    let role: String =
        sqlx::query_scalar("SELECT organization_role FROM users WHERE external_ref = ?")
            .bind("idp|alice")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(role, "viewer");
}

#[tokio::test]
async fn created_event_with_unknown_organization_is_rejected() {
    let pool = common::test_pool().await;
    let app = common::test_router(pool);

    let event = json!({
        "type": "user.created",
        "external_ref": "idp|bob",
        "email": "bob@example.com",
        "display_name": "Bob",
        "organization_id": "01JABSENTORG0000000000000"
    });
    let response = app.oneshot(webhook_request(event, SECRET)).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn updated_event_patches_profile_but_never_role() {
    let pool = common::test_pool().await;
    let org = seed_organization(&pool, "acme").await;
    seed_user(&pool, "idp|carol", OrganizationRole::Admin, Some(&org)).await;
    let app = common::test_router(pool.clone());

    let event = json!({
        "type": "user.updated",
        "external_ref": "idp|carol",
        "email": "carol@corp.example.com",
        "display_name": "Carol C."
    });
    let response = app.oneshot(webhook_request(event, SECRET)).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::OK);

    let (email, display_name, role): (String, String, String) = sqlx::query_as(
        "SELECT email, display_name, organization_role FROM users WHERE external_ref = ?",
    )
    .bind("idp|carol")
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(email, "carol@corp.example.com");
    assert_eq!(display_name, "Carol C.");
    // Role is out of the event feed's reach.
    assert_eq!(role, "admin");
}

#[tokio::test]
async fn deleted_event_cascades_memberships() {
    let pool = common::test_pool().await;
    let org = seed_organization(&pool, "acme").await;
    let user = seed_user(&pool, "idp|dave", OrganizationRole::Member, Some(&org)).await;
    let project = seed_project(&pool, &org, "handbook").await;
    seed_membership(&pool, &project, &user, ProjectRole::Member).await;
    let app = common::test_router(pool.clone());

    let event = json!({"type": "user.deleted", "external_ref": "idp|dave"});
    let response = app
        .clone()
        .oneshot(webhook_request(event.clone(), SECRET))
        .await
        .unwrap();
    assert_eq!(response.status(), http::StatusCode::OK);

    assert_eq!(count_users_with_ref(&pool, "idp|dave").await, 0);
    let memberships: i64 = sqlx::query_scalar("SELECT count(*) FROM memberships WHERE user_id = ?")
        .bind(&user)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(memberships, 0);

    // Redelivery is a no-op.
    let again = app.oneshot(webhook_request(event, SECRET)).await.unwrap();
    assert_eq!(again.status(), http::StatusCode::OK);
    let body = again.into_body().collect().await.unwrap().to_bytes();
    let outcome: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(outcome["deleted"], false);
}
