//! Identity-provider event feed.
//!
//! The upstream provider owns authentication and user provisioning; this
//! endpoint keeps the local user table in sync. Created events are
//! idempotent upserts, Updated events only touch profile fields, Deleted
//! events cascade membership removal in one transaction.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::{
    db,
    domain::{OrganizationId, OrganizationRole, UserId},
    error::AppError,
    AppState,
};

const SECRET_HEADER: &str = "x-webhook-secret";

/// Lifecycle events delivered by the identity provider.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum IdentityEvent {
    #[serde(rename = "user.created")]
    Created {
        external_ref: String,
        email: String,
        display_name: String,
        organization_id: Option<String>,
    },
    #[serde(rename = "user.updated")]
    Updated {
        external_ref: String,
        email: Option<String>,
        display_name: Option<String>,
        avatar_url: Option<String>,
    },
    #[serde(rename = "user.deleted")]
    Deleted { external_ref: String },
}

/// POST /webhooks/identity — Apply one lifecycle event.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<IdentityEvent>,
) -> Result<Json<Value>, AppError> {
    let secret = headers
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if secret != Some(state.config.webhook_secret.as_str()) {
        return Err(AppError::Unauthenticated);
    }

    match event {
        IdentityEvent::Created {
            external_ref,
            email,
            display_name,
            organization_id,
        } => {
            let organization_id = match organization_id {
                Some(id) => {
                    // Reject events pointing at organizations we do not know.
                    db::organizations::find_by_id(&state.db, &id)
                        .await?
                        .ok_or(AppError::NotFound)?;
                    Some(OrganizationId::from_string(&id).map_err(|_| {
                        AppError::Validation("malformed organization id".to_string())
                    })?)
                }
                None => None,
            };

            // Provisioned users start at the least-privileged role; only
            // privileged administrative operations raise it afterwards.
            let new_user = db::users::NewUser {
                id: UserId::new(),
                external_ref,
                email,
                display_name,
                organization_role: OrganizationRole::Viewer,
                organization_id,
            };
            let created = db::users::insert_if_absent(&state.db, &new_user).await?;
            Ok(Json(json!({ "created": created })))
        }
        IdentityEvent::Updated {
            external_ref,
            email,
            display_name,
            avatar_url,
        } => {
            db::users::update_profile(
                &state.db,
                &external_ref,
                email.as_deref(),
                display_name.as_deref(),
                avatar_url.as_deref(),
            )
            .await?;
            Ok(Json(json!({ "updated": true })))
        }
        IdentityEvent::Deleted { external_ref } => {
            let deleted = match db::users::find_by_external_ref(&state.db, &external_ref).await? {
                Some(user) => {
                    db::users::delete_cascading(&state.db, &user.id).await?;
                    true
                }
                // Redelivery after a completed delete is a no-op.
                None => false,
            };
            Ok(Json(json!({ "deleted": deleted })))
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/webhooks/identity", post(receive))
}
