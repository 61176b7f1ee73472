use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::app::{
    authz::{authorize, authorize_user_mutation, Mode, ResourceRef},
    db::{self, UpdateOutcome},
    domain::{Permission, ProjectRole},
    error::AppError,
    identity::IdentityRef,
    AppState,
};

/// Request body for granting or changing a project role.
#[derive(Debug, Deserialize)]
pub struct UpsertMembershipRequest {
    pub role: ProjectRole,
    /// Required when the membership already exists; the optimistic marker
    /// read from the current row.
    pub expected_version: Option<i64>,
}

/// Response for a membership row.
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub project_id: String,
    pub user_id: String,
    pub role: String,
    pub version: i64,
}

impl From<db::memberships::Membership> for MembershipResponse {
    fn from(m: db::memberships::Membership) -> Self {
        Self {
            project_id: m.project_id,
            user_id: m.user_id,
            role: m.role,
            version: m.version,
        }
    }
}

/// GET /app/orgs/{org_id}/projects/{project_id}/members — List the project's
/// membership roster. Anyone who can view the project can see who is on it.
pub async fn list(
    identity: IdentityRef,
    State(state): State<AppState>,
    Path((org_id, project_id)): Path<(String, String)>,
) -> Result<Json<Vec<MembershipResponse>>, AppError> {
    let resource = ResourceRef::project(&org_id, &project_id);
    let ctx = authorize(
        &state.db,
        identity.as_deref(),
        &resource,
        &[Permission::ViewProjects],
        Mode::All,
    )
    .await?;
    let project = ctx.project.ok_or(AppError::Internal)?;

    let rows = db::memberships::list_for_project(&state.db, &project.id).await?;
    Ok(Json(rows.into_iter().map(MembershipResponse::from).collect()))
}

/// PUT /app/orgs/{org_id}/projects/{project_id}/members/{user_id} — Grant a
/// project role, or change an existing one.
///
/// The guard already pinned the target to the context organization, which is
/// the membership-same-organization invariant: a project can only enroll
/// users of its own tenant.
pub async fn upsert(
    identity: IdentityRef,
    State(state): State<AppState>,
    Path((org_id, project_id, user_id)): Path<(String, String, String)>,
    Json(request): Json<UpsertMembershipRequest>,
) -> Result<(StatusCode, Json<MembershipResponse>), AppError> {
    let resource = ResourceRef::project(&org_id, &project_id);
    let (ctx, target) = authorize_user_mutation(
        &state.db,
        identity.as_deref(),
        &resource,
        &[Permission::ManageMembers],
        Mode::All,
        &user_id,
    )
    .await?;
    let project = ctx.project.ok_or(AppError::Internal)?;

    let existing = db::memberships::find(&state.db, &project.id, &target.id).await?;
    let status = match existing {
        Some(row) => {
            let expected = request.expected_version.ok_or_else(|| {
                AppError::Validation("expected_version is required for an existing membership".to_string())
            })?;
            let outcome = db::memberships::update_role(
                &state.db,
                &row.project_id,
                &row.user_id,
                request.role,
                expected,
            )
            .await?;
            if outcome == UpdateOutcome::Stale {
                return Err(AppError::Conflict(
                    "membership was modified by a concurrent request".to_string(),
                ));
            }
            StatusCode::OK
        }
        None => {
            // A concurrent grant can still win the primary key between our
            // read and this insert.
            if let Err(err) =
                db::memberships::insert(&state.db, &project.id, &target.id, request.role).await
            {
                if db::is_unique_violation(&err) {
                    return Err(AppError::Conflict(
                        "membership was created by a concurrent request".to_string(),
                    ));
                }
                return Err(err.into());
            }
            StatusCode::CREATED
        }
    };

    let row = db::memberships::find(&state.db, &project.id, &target.id)
        .await?
        .ok_or(AppError::Internal)?;
    Ok((status, Json(row.into())))
}

/// DELETE /app/orgs/{org_id}/projects/{project_id}/members/{user_id} —
/// Revoke a project role.
pub async fn remove(
    identity: IdentityRef,
    State(state): State<AppState>,
    Path((org_id, project_id, user_id)): Path<(String, String, String)>,
) -> Result<StatusCode, AppError> {
    let resource = ResourceRef::project(&org_id, &project_id);
    let (ctx, target) = authorize_user_mutation(
        &state.db,
        identity.as_deref(),
        &resource,
        &[Permission::ManageMembers],
        Mode::All,
        &user_id,
    )
    .await?;
    let project = ctx.project.ok_or(AppError::Internal)?;

    db::memberships::delete(&state.db, &project.id, &target.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/app/orgs/{org_id}/projects/{project_id}/members",
            get(list),
        )
        .route(
            "/app/orgs/{org_id}/projects/{project_id}/members/{user_id}",
            put(upsert).delete(remove),
        )
}
