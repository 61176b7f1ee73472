use axum::Router;
use sqlx::SqlitePool;

/// Human-readable application name, used in logs and responses.
pub const APP_NAME: &str = "Docspace";

/// Shared state available to all handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: config::Config,
}

/// App routes (dashboard, projects, users, memberships, identity feed).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(features::dashboard::routes())
        .merge(features::projects::routes())
        .merge(features::members::routes())
        .merge(features::memberships::routes())
        .merge(features::identity_webhook::routes())
}

pub mod authz;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod features;
pub mod identity;
