use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{OrganizationId, ProjectId, ProjectStatus};

/// Database row for projects table.
#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: String,
    pub organization_id: String,
    pub slug: String,
    pub title: String,
    pub status: String,
    pub created_at: i64,
}

/// Data structure for inserting a new project.
pub struct NewProject {
    pub id: ProjectId,
    pub organization_id: OrganizationId,
    pub slug: String,
    pub title: String,
}

/// Find a project by ID.
pub async fn find_by_id<'e, E>(executor: E, project_id: &str) -> Result<Option<Project>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Project>(
        "SELECT id, organization_id, slug, title, status, created_at FROM projects WHERE id = ?",
    )
    .bind(project_id)
    .fetch_optional(executor)
    .await
}

/// List projects owned by an organization.
pub async fn list_by_organization<'e, E>(
    executor: E,
    organization_id: &str,
) -> Result<Vec<Project>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Project>(
        "SELECT id, organization_id, slug, title, status, created_at \
         FROM projects WHERE organization_id = ? ORDER BY id",
    )
    .bind(organization_id)
    .fetch_all(executor)
    .await
}

/// Insert a new project. Starts in Draft status.
pub async fn insert<'e, E>(executor: E, project: &NewProject) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO projects (id, organization_id, slug, title, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(project.id.as_str())
    .bind(project.organization_id.as_str())
    .bind(&project.slug)
    .bind(&project.title)
    .bind(ProjectStatus::Draft.to_string())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Set a project's lifecycle status.
pub async fn update_status<'e, E>(
    executor: E,
    project_id: &str,
    status: ProjectStatus,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE projects SET status = ? WHERE id = ?")
        .bind(status.to_string())
        .bind(project_id)
        .execute(executor)
        .await?;
    Ok(())
}
