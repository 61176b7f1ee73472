#![allow(dead_code)]

use axum::body::Body;
use docspace::app::db;
use docspace::app::domain::{
    OrganizationId, OrganizationRole, ProjectId, ProjectRole, UserId,
};
use docspace::create_router;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub async fn test_pool() -> SqlitePool {
    // One connection so the in-memory database is shared across all queries.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn test_router(pool: SqlitePool) -> axum::Router {
    let state = docspace::app::AppState {
        db: pool,
        config: docspace::app::config::Config::for_tests(),
    };
    create_router(state)
}

/// Insert an organization, returning its id.
pub async fn seed_organization(pool: &SqlitePool, slug: &str) -> String {
    let org = db::organizations::NewOrganization {
        id: OrganizationId::new(),
        slug: slug.to_string(),
        name: slug.to_string(),
    };
    db::organizations::insert(pool, &org).await.unwrap();
    org.id.as_str()
}

/// Insert a user with the given role and organization, returning their id.
/// The external reference doubles as the bearer token in tests.
pub async fn seed_user(
    pool: &SqlitePool,
    external_ref: &str,
    role: OrganizationRole,
    organization_id: Option<&str>,
) -> String {
    let user = db::users::NewUser {
        id: UserId::new(),
        external_ref: external_ref.to_string(),
        email: format!("{}@example.com", external_ref),
        display_name: external_ref.to_string(),
        organization_role: role,
        organization_id: organization_id
            .map(|id| OrganizationId::from_string(id).unwrap()),
    };
    assert!(db::users::insert_if_absent(pool, &user).await.unwrap());
    user.id.as_str()
}

/// Insert a project, returning its id.
pub async fn seed_project(pool: &SqlitePool, organization_id: &str, slug: &str) -> String {
    let project = db::projects::NewProject {
        id: ProjectId::new(),
        organization_id: OrganizationId::from_string(organization_id).unwrap(),
        slug: slug.to_string(),
        title: slug.to_string(),
    };
    db::projects::insert(pool, &project).await.unwrap();
    project.id.as_str()
}

pub async fn seed_membership(
    pool: &SqlitePool,
    project_id: &str,
    user_id: &str,
    role: ProjectRole,
) {
    db::memberships::insert(pool, project_id, user_id, role)
        .await
        .unwrap();
}

/// Build a request with the external identity reference as bearer token.
pub fn request(
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<serde_json::Value>,
) -> http::Request<Body> {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Deliver an identity webhook event with the test shared secret.
pub fn webhook_request(event: serde_json::Value, secret: &str) -> http::Request<Body> {
    http::Request::builder()
        .method("POST")
        .uri("/webhooks/identity")
        .header("content-type", "application/json")
        .header("x-webhook-secret", secret)
        .body(Body::from(event.to_string()))
        .unwrap()
}

pub async fn count_users_with_ref(pool: &SqlitePool, external_ref: &str) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM users WHERE external_ref = ?")
        .bind(external_ref)
        .fetch_one(pool)
        .await
        .unwrap()
}
