//! Per-request tenant context.
//!
//! Built once per request by the route guard and threaded through handlers.
//! Never rebuilt per individual permission check.

use sqlx::SqlitePool;

use crate::app::db;
use crate::app::domain::{OrganizationRole, ProjectRole};
use crate::app::error::AppError;

/// The acting user, with role and organization linkage parsed into domain
/// types. A malformed stored role symbol surfaces as Validation, never a
/// silent default.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: String,
    pub external_ref: String,
    pub email: String,
    pub display_name: String,
    pub organization_role: OrganizationRole,
    /// None only for the organization-spanning root role.
    pub organization_id: Option<String>,
    pub version: i64,
}

impl Principal {
    pub fn from_row(row: db::users::User) -> Result<Self, AppError> {
        let organization_role = row.organization_role.parse::<OrganizationRole>().map_err(|_| {
            AppError::Validation(format!("malformed role symbol: {}", row.organization_role))
        })?;
        Ok(Self {
            id: row.id,
            external_ref: row.external_ref,
            email: row.email,
            display_name: row.display_name,
            organization_role,
            organization_id: row.organization_id,
            version: row.version,
        })
    }
}

/// The principal's membership row for the context project, role parsed.
#[derive(Debug, Clone)]
pub struct ProjectMembership {
    pub project_id: String,
    pub user_id: String,
    pub role: ProjectRole,
    pub version: i64,
}

impl ProjectMembership {
    pub fn from_row(row: db::memberships::Membership) -> Result<Self, AppError> {
        let role = row
            .role
            .parse::<ProjectRole>()
            .map_err(|_| AppError::Validation(format!("malformed role symbol: {}", row.role)))?;
        Ok(Self {
            project_id: row.project_id,
            user_id: row.user_id,
            role,
            version: row.version,
        })
    }
}

/// Identifies the target resource of a request: an organization and,
/// optionally, a project inside it.
#[derive(Debug, Clone)]
pub struct ResourceRef {
    pub organization_id: String,
    pub project_id: Option<String>,
}

impl ResourceRef {
    pub fn organization(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            project_id: None,
        }
    }

    pub fn project(organization_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            project_id: Some(project_id.into()),
        }
    }
}

/// Immutable per-request snapshot of everything a decision needs.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub principal: Principal,
    pub organization: db::organizations::Organization,
    pub project: Option<db::projects::Project>,
    pub membership: Option<ProjectMembership>,
}

/// Load the target organization and, when the resource names one, the project
/// and the principal's membership row for it.
///
/// Returns `NotFound` when the organization or project is missing, or when the
/// project does not belong to the named organization. The cross-tenant case is
/// deliberately indistinguishable from a missing resource.
pub async fn build(
    pool: &SqlitePool,
    user: db::users::User,
    resource: &ResourceRef,
) -> Result<TenantContext, AppError> {
    let principal = Principal::from_row(user)?;

    let organization = db::organizations::find_by_id(pool, &resource.organization_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let (project, membership) = match &resource.project_id {
        Some(project_id) => {
            let project = db::projects::find_by_id(pool, project_id)
                .await?
                .ok_or(AppError::NotFound)?;
            if project.organization_id != organization.id {
                return Err(AppError::NotFound);
            }
            let membership = db::memberships::find(pool, &project.id, &principal.id)
                .await?
                .map(ProjectMembership::from_row)
                .transpose()?;
            (Some(project), membership)
        }
        None => (None, None),
    };

    Ok(TenantContext {
        principal,
        organization,
        project,
        membership,
    })
}
