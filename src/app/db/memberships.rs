use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use super::UpdateOutcome;
use crate::app::domain::ProjectRole;

/// Database row for memberships table. One row per (project, user) pair,
/// enforced by the composite primary key.
#[derive(Debug, Clone, FromRow)]
pub struct Membership {
    pub project_id: String,
    pub user_id: String,
    pub role: String,
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Find the membership row for (project, user). Returns None if the user has
/// no project-scope grant.
pub async fn find<'e, E>(
    executor: E,
    project_id: &str,
    user_id: &str,
) -> Result<Option<Membership>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Membership>(
        "SELECT project_id, user_id, role, version, created_at, updated_at \
         FROM memberships WHERE project_id = ? AND user_id = ?",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// List all membership rows for a project.
pub async fn list_for_project<'e, E>(
    executor: E,
    project_id: &str,
) -> Result<Vec<Membership>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Membership>(
        "SELECT project_id, user_id, role, version, created_at, updated_at \
         FROM memberships WHERE project_id = ? ORDER BY user_id",
    )
    .bind(project_id)
    .fetch_all(executor)
    .await
}

/// Insert a membership. Fails on the primary key if the pair already exists;
/// use update_role to change an existing row.
pub async fn insert<'e, E>(
    executor: E,
    project_id: &str,
    user_id: &str,
    role: ProjectRole,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO memberships (project_id, user_id, role, version, created_at, updated_at) \
         VALUES (?, ?, ?, 0, ?, ?)",
    )
    .bind(project_id)
    .bind(user_id)
    .bind(role.to_string())
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Change a membership's project role with an optimistic version check.
pub async fn update_role<'e, E>(
    executor: E,
    project_id: &str,
    user_id: &str,
    role: ProjectRole,
    expected_version: i64,
) -> Result<UpdateOutcome, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE memberships SET role = ?, version = version + 1, updated_at = ? \
         WHERE project_id = ? AND user_id = ? AND version = ?",
    )
    .bind(role.to_string())
    .bind(now)
    .bind(project_id)
    .bind(user_id)
    .bind(expected_version)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        Ok(UpdateOutcome::Stale)
    } else {
        Ok(UpdateOutcome::Applied)
    }
}

/// Remove a membership row.
pub async fn delete<'e, E>(executor: E, project_id: &str, user_id: &str) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM memberships WHERE project_id = ? AND user_id = ?")
        .bind(project_id)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}
