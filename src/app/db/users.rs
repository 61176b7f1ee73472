use sqlx::{FromRow, SqliteExecutor, SqlitePool};
use time::OffsetDateTime;

use super::UpdateOutcome;
use crate::app::domain::{OrganizationId, OrganizationRole, UserId};

/// Database row for users table. Role and organization id stay stringly here;
/// the tenant context builder parses them into domain types.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub external_ref: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub organization_role: String,
    pub organization_id: Option<String>,
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new user.
pub struct NewUser {
    pub id: UserId,
    pub external_ref: String,
    pub email: String,
    pub display_name: String,
    pub organization_role: OrganizationRole,
    pub organization_id: Option<OrganizationId>,
}

/// Find a user by the identity provider's external reference.
/// One point lookup, no caching: roles can change between requests.
pub async fn find_by_external_ref<'e, E>(
    executor: E,
    external_ref: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_ref = ?")
        .bind(external_ref)
        .fetch_optional(executor)
        .await
}

/// Find a user by ID.
pub async fn find_by_id<'e, E>(executor: E, user_id: &str) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

/// List users belonging to an organization.
pub async fn list_by_organization<'e, E>(
    executor: E,
    organization_id: &str,
) -> Result<Vec<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE organization_id = ? ORDER BY id")
        .bind(organization_id)
        .fetch_all(executor)
        .await
}

/// Insert a user if no row exists for the external reference. Idempotent:
/// redelivered identity-provider Created events hit the unique index and
/// become a no-op. Returns true when a row was actually inserted.
pub async fn insert_if_absent<'e, E>(executor: E, user: &NewUser) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "INSERT OR IGNORE INTO users \
         (id, external_ref, email, display_name, avatar_url, organization_role, organization_id, version, created_at, updated_at) \
         VALUES (?, ?, ?, ?, NULL, ?, ?, 0, ?, ?)",
    )
    .bind(user.id.as_str())
    .bind(&user.external_ref)
    .bind(&user.email)
    .bind(&user.display_name)
    .bind(user.organization_role.to_string())
    .bind(user.organization_id.as_ref().map(|id| id.as_str()))
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Patch mutable profile fields from an identity-provider Updated event.
/// Never touches organization_role or organization_id.
pub async fn update_profile<'e, E>(
    executor: E,
    external_ref: &str,
    email: Option<&str>,
    display_name: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "UPDATE users SET \
         email = COALESCE(?, email), \
         display_name = COALESCE(?, display_name), \
         avatar_url = COALESCE(?, avatar_url), \
         updated_at = ? \
         WHERE external_ref = ?",
    )
    .bind(email)
    .bind(display_name)
    .bind(avatar_url)
    .bind(now)
    .bind(external_ref)
    .execute(executor)
    .await?;
    Ok(())
}

/// Change a user's organization role with an optimistic version check.
/// A concurrent writer that already bumped the version sees `Stale`.
pub async fn update_role<'e, E>(
    executor: E,
    user_id: &str,
    role: OrganizationRole,
    expected_version: i64,
) -> Result<UpdateOutcome, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE users SET organization_role = ?, version = version + 1, updated_at = ? \
         WHERE id = ? AND version = ?",
    )
    .bind(role.to_string())
    .bind(now)
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

/// Delete a user and their membership rows in one transaction.
/// The cascade is explicit so the store never holds orphaned memberships.
pub async fn delete_cascading(pool: &SqlitePool, user_id: &str) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM memberships WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
