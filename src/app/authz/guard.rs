//! Route guard: principal resolution, context building, and the decision
//! engine chained for one inbound request.
//!
//! States run Unauthenticated -> Authenticated -> Authorized | Denied; the
//! first failing step short-circuits and nothing is retried here. Handlers
//! call [`authorize`] and never compare role strings themselves.

use sqlx::SqlitePool;

use super::context::{self, ResourceRef, TenantContext};
use super::decision::{decide, Mode, ProtectedTarget};
use crate::app::db;
use crate::app::domain::{OrganizationRole, Permission};
use crate::app::error::AppError;

/// Map the external identity reference to a user row. One point lookup, no
/// caching: a role change must be visible on the very next request.
///
/// Store failures become Internal with a correlation id in the log, distinct
/// from a denial so callers can retry transient outages.
pub async fn resolve(
    pool: &SqlitePool,
    external_ref: Option<&str>,
) -> Result<db::users::User, AppError> {
    let external_ref = external_ref.ok_or(AppError::Unauthenticated)?;
    db::users::find_by_external_ref(pool, external_ref)
        .await?
        .ok_or(AppError::Unauthenticated)
}

/// Authorize one request: resolve the principal, build the tenant context,
/// ask the decision engine. Returns the context for the handler's business
/// logic on Allow.
pub async fn authorize(
    pool: &SqlitePool,
    external_ref: Option<&str>,
    resource: &ResourceRef,
    permissions: &[Permission],
    mode: Mode,
) -> Result<TenantContext, AppError> {
    let user = resolve(pool, external_ref).await?;
    let ctx = context::build(pool, user, resource).await?;
    let decision = decide(&ctx, permissions, mode, None);
    if !decision.allowed {
        tracing::debug!(
            principal = %ctx.principal.id,
            organization = %ctx.organization.id,
            reason = %decision.reason,
            "authorization denied"
        );
        return Err(AppError::Unauthorized(decision.reason));
    }
    Ok(ctx)
}

/// Authorize a request that mutates another user's role, membership, or
/// existence. Loads the target row so the engine's protection pre-conditions
/// see who is being acted on, and returns it alongside the context.
///
/// A target outside the context organization reads as NotFound, the same as a
/// missing user: cross-tenant probes learn nothing. Root targets are exempt
/// from that check and instead trip the engine's top-role protection.
pub async fn authorize_user_mutation(
    pool: &SqlitePool,
    external_ref: Option<&str>,
    resource: &ResourceRef,
    permissions: &[Permission],
    mode: Mode,
    target_user_id: &str,
) -> Result<(TenantContext, db::users::User), AppError> {
    let user = resolve(pool, external_ref).await?;
    let ctx = context::build(pool, user, resource).await?;

    let target_row = db::users::find_by_id(pool, target_user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let target_role = target_row.organization_role.parse::<OrganizationRole>().map_err(|_| {
        AppError::Validation(format!("malformed role symbol: {}", target_row.organization_role))
    })?;
    if target_role != OrganizationRole::Root
        && target_row.organization_id.as_deref() != Some(ctx.organization.id.as_str())
    {
        return Err(AppError::NotFound);
    }

    let target = ProtectedTarget {
        user_id: target_row.id.clone(),
        organization_role: target_role,
    };
    let decision = decide(&ctx, permissions, mode, Some(&target));
    if !decision.allowed {
        tracing::debug!(
            principal = %ctx.principal.id,
            target = %target.user_id,
            reason = %decision.reason,
            "authorization denied"
        );
        return Err(AppError::Unauthorized(decision.reason));
    }
    Ok((ctx, target_row))
}
