use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::{
    authz::{authorize, Mode, ResourceRef},
    db,
    domain::{OrganizationId, Permission, ProjectId, ProjectStatus},
    error::AppError,
    identity::IdentityRef,
    AppState,
};

/// Request body for creating a project.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 64))]
    pub slug: String,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
}

/// Response for a project.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub organization_id: String,
    pub slug: String,
    pub title: String,
    pub status: String,
}

impl From<db::projects::Project> for ProjectResponse {
    fn from(project: db::projects::Project) -> Self {
        Self {
            id: project.id,
            organization_id: project.organization_id,
            slug: project.slug,
            title: project.title,
            status: project.status,
        }
    }
}

/// GET /app/orgs/{org_id}/projects — List the organization's projects.
pub async fn list(
    identity: IdentityRef,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let resource = ResourceRef::organization(&org_id);
    let ctx = authorize(
        &state.db,
        identity.as_deref(),
        &resource,
        &[Permission::ViewProjects],
        Mode::All,
    )
    .await?;

    let projects = db::projects::list_by_organization(&state.db, &ctx.organization.id).await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// POST /app/orgs/{org_id}/projects — Create a project in the organization.
pub async fn create(
    identity: IdentityRef,
    State(state): State<AppState>,
    Path(org_id): Path<String>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let resource = ResourceRef::organization(&org_id);
    let ctx = authorize(
        &state.db,
        identity.as_deref(),
        &resource,
        &[Permission::ManageProject],
        Mode::All,
    )
    .await?;

    let organization_id = OrganizationId::from_string(&ctx.organization.id)
        .map_err(|_| AppError::Internal)?;
    let project = db::projects::NewProject {
        id: ProjectId::new(),
        organization_id,
        slug: request.slug,
        title: request.title,
    };
    if let Err(err) = db::projects::insert(&state.db, &project).await {
        if db::is_unique_violation(&err) {
            return Err(AppError::Conflict(
                "a project with this slug already exists in the organization".to_string(),
            ));
        }
        return Err(err.into());
    }

    let created = db::projects::find_by_id(&state.db, &project.id.as_str())
        .await?
        .ok_or(AppError::Internal)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// POST /app/orgs/{org_id}/projects/{project_id}/archive — Archive a project.
/// Grantable at either scope: organization admin or project admin.
pub async fn archive(
    identity: IdentityRef,
    State(state): State<AppState>,
    Path((org_id, project_id)): Path<(String, String)>,
) -> Result<Json<ProjectResponse>, AppError> {
    let resource = ResourceRef::project(&org_id, &project_id);
    let ctx = authorize(
        &state.db,
        identity.as_deref(),
        &resource,
        &[Permission::ManageProject],
        Mode::All,
    )
    .await?;

    let project = ctx.project.ok_or(AppError::Internal)?;
    db::projects::update_status(&state.db, &project.id, ProjectStatus::Archived).await?;

    let updated = db::projects::find_by_id(&state.db, &project.id)
        .await?
        .ok_or(AppError::Internal)?;
    Ok(Json(updated.into()))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/app/orgs/{org_id}/projects", get(list).post(create))
        .route("/app/orgs/{org_id}/projects/{project_id}/archive", post(archive))
}
