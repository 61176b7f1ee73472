use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::app::{
    authz::{authorize, authorize_user_mutation, Mode, ResourceRef},
    db::{self, UpdateOutcome},
    domain::{OrganizationRole, Permission},
    error::AppError,
    identity::IdentityRef,
    AppState,
};

/// Response for an organization user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub organization_role: String,
    /// Optimistic marker for role updates; echo it back in UpdateRoleRequest.
    pub version: i64,
}

impl From<db::users::User> for UserResponse {
    fn from(user: db::users::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            organization_role: user.organization_role,
            version: user.version,
        }
    }
}

/// Request body for changing a user's organization role.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: OrganizationRole,
    /// The version the caller last read. A stale value means someone else
    /// changed the row first and yields 409.
    pub expected_version: i64,
}

/// GET /app/orgs/{org_id}/users — List the organization's users.
pub async fn list(
    identity: IdentityRef,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let resource = ResourceRef::organization(&org_id);
    let ctx = authorize(
        &state.db,
        identity.as_deref(),
        &resource,
        &[Permission::ViewUsers],
        Mode::All,
    )
    .await?;

    let users = db::users::list_by_organization(&state.db, &ctx.organization.id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PUT /app/orgs/{org_id}/users/{user_id}/role — Change a user's
/// organization role. The guard's pre-conditions reject self-changes and
/// root targets before any rank comparison.
pub async fn update_role(
    identity: IdentityRef,
    State(state): State<AppState>,
    Path((org_id, user_id)): Path<(String, String)>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if request.role == OrganizationRole::Root {
        return Err(AppError::Validation(
            "the top role cannot be assigned through this endpoint".to_string(),
        ));
    }

    let resource = ResourceRef::organization(&org_id);
    let (_ctx, target) = authorize_user_mutation(
        &state.db,
        identity.as_deref(),
        &resource,
        &[Permission::ManageUsers],
        Mode::All,
        &user_id,
    )
    .await?;

    let outcome = db::users::update_role(
        &state.db,
        &target.id,
        request.role,
        request.expected_version,
    )
    .await?;
    if outcome == UpdateOutcome::Stale {
        return Err(AppError::Conflict(
            "user was modified by a concurrent request".to_string(),
        ));
    }

    let updated = db::users::find_by_id(&state.db, &target.id)
        .await?
        .ok_or(AppError::Internal)?;
    Ok(Json(updated.into()))
}

/// DELETE /app/orgs/{org_id}/users/{user_id} — Remove a user and, in the
/// same transaction, their membership rows.
pub async fn remove(
    identity: IdentityRef,
    State(state): State<AppState>,
    Path((org_id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let resource = ResourceRef::organization(&org_id);
    let (_ctx, target) = authorize_user_mutation(
        &state.db,
        identity.as_deref(),
        &resource,
        &[Permission::ManageUsers],
        Mode::All,
        &user_id,
    )
    .await?;

    db::users::delete_cascading(&state.db, &target.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/app/orgs/{org_id}/users", get(list))
        .route("/app/orgs/{org_id}/users/{user_id}/role", put(update_role))
        .route("/app/orgs/{org_id}/users/{user_id}", delete(remove))
}
