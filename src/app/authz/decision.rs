//! Authorization decision engine.
//!
//! Pure functions over an immutable [`TenantContext`] and the static
//! permission catalog. No I/O, no side effects; safe to call from any number
//! of concurrent requests. A Deny is never recovered into an Allow here or
//! anywhere downstream.

use serde::Serialize;

use super::catalog::{catalog, Scope};
use super::context::TenantContext;
use crate::app::domain::{OrganizationRole, Permission};

/// How a set of requested permissions combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every permission in the set must be granted.
    All,
    /// At least one permission in the set must be granted.
    Any,
}

/// Ephemeral verdict for one request. Produced and consumed within the
/// request; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    pub reason: String,
    pub matched_scope: Option<Scope>,
}

impl AuthorizationDecision {
    fn allow(scope: Scope) -> Self {
        Self {
            allowed: true,
            reason: String::new(),
            matched_scope: Some(scope),
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
            matched_scope: None,
        }
    }
}

/// The user a mutating request acts on. Feeds the protection pre-conditions.
#[derive(Debug, Clone)]
pub struct ProtectedTarget {
    pub user_id: String,
    pub organization_role: OrganizationRole,
}

/// Decide one permission set against the context.
///
/// Protection pre-conditions run first when any requested permission mutates
/// another user's role, membership, or existence, and short-circuit to Deny
/// regardless of the actor's rank - root actors included. After that, a root
/// principal is allowed unconditionally; everyone else gets the OR of the
/// organization-scope and project-scope grant paths.
pub fn decide(
    ctx: &TenantContext,
    permissions: &[Permission],
    mode: Mode,
    target: Option<&ProtectedTarget>,
) -> AuthorizationDecision {
    if permissions.is_empty() {
        return AuthorizationDecision::deny("no permission requested");
    }

    if let Some(target) = target {
        if permissions.iter().any(|p| p.mutates_users()) {
            if target.user_id == ctx.principal.id {
                return AuthorizationDecision::deny("self-modification forbidden");
            }
            if target.organization_role == OrganizationRole::Root {
                return AuthorizationDecision::deny("cannot modify top-role principal");
            }
        }
    }

    if ctx.principal.organization_role == OrganizationRole::Root {
        return AuthorizationDecision::allow(Scope::Organization);
    }

    match mode {
        Mode::All => {
            let mut matched = None;
            for permission in permissions {
                let decision = check_one(ctx, *permission);
                if !decision.allowed {
                    return decision;
                }
                // Report the scope that satisfied the first permission.
                matched = matched.or(decision.matched_scope);
            }
            AuthorizationDecision {
                allowed: true,
                reason: String::new(),
                matched_scope: matched,
            }
        }
        Mode::Any => {
            let mut reasons = Vec::new();
            for permission in permissions {
                let decision = check_one(ctx, *permission);
                if decision.allowed {
                    return decision;
                }
                reasons.push(format!("{}: {}", permission, decision.reason));
            }
            AuthorizationDecision::deny(reasons.join("; "))
        }
    }
}

/// Single-permission convenience wrapper.
pub fn decide_one(ctx: &TenantContext, permission: Permission) -> AuthorizationDecision {
    decide(ctx, &[permission], Mode::All, None)
}

/// OR of the two grant paths for one permission.
fn check_one(ctx: &TenantContext, permission: Permission) -> AuthorizationDecision {
    let mut reason = String::new();

    // Organization-scope path: same organization and sufficient org-role rank.
    if let Some(required) = catalog().minimum_rank(permission, Scope::Organization) {
        if ctx.principal.organization_id.as_deref() == Some(ctx.organization.id.as_str()) {
            let rank = ctx.principal.organization_role.rank();
            if rank >= required {
                return AuthorizationDecision::allow(Scope::Organization);
            }
            reason = format!(
                "organization role rank {} below required rank {}",
                rank, required
            );
        } else {
            reason = "principal belongs to a different organization".to_string();
        }
    }

    // Project-scope path: membership row exists and its rank suffices.
    if ctx.project.is_some() {
        if let Some(required) = catalog().minimum_rank(permission, Scope::Project) {
            match &ctx.membership {
                Some(membership) => {
                    let rank = membership.role.rank();
                    if rank >= required {
                        return AuthorizationDecision::allow(Scope::Project);
                    }
                    if !reason.is_empty() {
                        reason.push_str("; ");
                    }
                    reason.push_str(&format!(
                        "project role rank {} below required rank {}",
                        rank, required
                    ));
                }
                None => {
                    if !reason.is_empty() {
                        reason.push_str("; ");
                    }
                    reason.push_str("no membership for this project");
                }
            }
        }
    }

    if reason.is_empty() {
        reason = "permission not grantable at any available scope".to_string();
    }
    AuthorizationDecision::deny(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::authz::context::{Principal, ProjectMembership, TenantContext};
    use crate::app::db;
    use crate::app::domain::ProjectRole;

    fn principal(role: OrganizationRole, org_id: Option<&str>) -> Principal {
        Principal {
            id: "user-1".to_string(),
            external_ref: "idp|user-1".to_string(),
            email: "u@example.com".to_string(),
            display_name: "U".to_string(),
            organization_role: role,
            organization_id: org_id.map(str::to_string),
            version: 0,
        }
    }

    fn organization(id: &str) -> db::organizations::Organization {
        db::organizations::Organization {
            id: id.to_string(),
            slug: id.to_string(),
            name: id.to_string(),
            created_at: 0,
        }
    }

    fn project(id: &str, org_id: &str) -> db::projects::Project {
        db::projects::Project {
            id: id.to_string(),
            organization_id: org_id.to_string(),
            slug: id.to_string(),
            title: id.to_string(),
            status: "active".to_string(),
            created_at: 0,
        }
    }

    fn membership(project_id: &str, user_id: &str, role: ProjectRole) -> ProjectMembership {
        ProjectMembership {
            project_id: project_id.to_string(),
            user_id: user_id.to_string(),
            role,
            version: 0,
        }
    }

    fn ctx(
        org_role: OrganizationRole,
        project_role: Option<ProjectRole>,
    ) -> TenantContext {
        TenantContext {
            principal: principal(org_role, Some("org-1")),
            organization: organization("org-1"),
            project: Some(project("proj-1", "org-1")),
            membership: project_role.map(|r| membership("proj-1", "user-1", r)),
        }
    }

    #[test]
    fn or_of_scopes_all_four_combinations() {
        // manage-project needs org admin or project admin.
        let both_low = decide_one(&ctx(OrganizationRole::Manager, Some(ProjectRole::Member)), Permission::ManageProject);
        assert!(!both_low.allowed);
        assert!(both_low.reason.contains("organization role rank"));
        assert!(both_low.reason.contains("project role rank"));

        let org_high = decide_one(&ctx(OrganizationRole::Admin, Some(ProjectRole::Member)), Permission::ManageProject);
        assert!(org_high.allowed);
        assert_eq!(org_high.matched_scope, Some(Scope::Organization));

        let project_high = decide_one(&ctx(OrganizationRole::Manager, Some(ProjectRole::Admin)), Permission::ManageProject);
        assert!(project_high.allowed);
        assert_eq!(project_high.matched_scope, Some(Scope::Project));

        let both_high = decide_one(&ctx(OrganizationRole::Admin, Some(ProjectRole::Admin)), Permission::ManageProject);
        assert!(both_high.allowed);
        // Organization path is evaluated first.
        assert_eq!(both_high.matched_scope, Some(Scope::Organization));
    }

    #[test]
    fn no_membership_denies_project_path() {
        let decision = decide_one(&ctx(OrganizationRole::Manager, None), Permission::ManageProject);
        assert!(!decision.allowed);
        assert!(decision.reason.contains("no membership for this project"));
    }

    #[test]
    fn root_is_allowed_everywhere() {
        // Root carries no organization id yet is allowed on any tenant.
        for permission in [
            Permission::ViewProjects,
            Permission::ManageProject,
            Permission::ManageUsers,
            Permission::ManageOrganization,
        ] {
            let context = TenantContext {
                principal: principal(OrganizationRole::Root, None),
                organization: organization("org-2"),
                project: None,
                membership: None,
            };
            let decision = decide_one(&context, permission);
            assert!(decision.allowed, "root denied {}", permission);
            assert_eq!(decision.matched_scope, Some(Scope::Organization));
        }
    }

    #[test]
    fn tenant_isolation_blocks_foreign_organization() {
        // Admin of org-1 probing a project owned by org-2: sufficient rank,
        // wrong tenant.
        let context = TenantContext {
            principal: principal(OrganizationRole::Admin, Some("org-1")),
            organization: organization("org-2"),
            project: Some(project("proj-9", "org-2")),
            membership: None,
        };
        let decision = decide_one(&context, Permission::ManageProject);
        assert!(!decision.allowed);
        assert!(decision.reason.contains("different organization"));
    }

    #[test]
    fn self_modification_denied_regardless_of_rank() {
        let context = ctx(OrganizationRole::Admin, None);
        let target = ProtectedTarget {
            user_id: context.principal.id.clone(),
            organization_role: OrganizationRole::Member,
        };
        let decision = decide(&context, &[Permission::ManageUsers], Mode::All, Some(&target));
        assert!(!decision.allowed);
        assert_eq!(decision.reason, "self-modification forbidden");

        // Even a root actor cannot act on themself.
        let root_context = TenantContext {
            principal: principal(OrganizationRole::Root, None),
            organization: organization("org-1"),
            project: None,
            membership: None,
        };
        let target = ProtectedTarget {
            user_id: root_context.principal.id.clone(),
            organization_role: OrganizationRole::Root,
        };
        let decision = decide(&root_context, &[Permission::ManageUsers], Mode::All, Some(&target));
        assert!(!decision.allowed);
    }

    #[test]
    fn top_role_target_is_protected_from_everyone() {
        let target = ProtectedTarget {
            user_id: "user-2".to_string(),
            organization_role: OrganizationRole::Root,
        };

        let admin_decision = decide(
            &ctx(OrganizationRole::Admin, None),
            &[Permission::ManageUsers],
            Mode::All,
            Some(&target),
        );
        assert!(!admin_decision.allowed);
        assert_eq!(admin_decision.reason, "cannot modify top-role principal");

        let root_context = TenantContext {
            principal: principal(OrganizationRole::Root, None),
            organization: organization("org-1"),
            project: None,
            membership: None,
        };
        let root_decision = decide(
            &root_context,
            &[Permission::ManageUsers],
            Mode::All,
            Some(&target),
        );
        assert!(!root_decision.allowed);
        assert_eq!(root_decision.reason, "cannot modify top-role principal");
    }

    #[test]
    fn protections_ignore_non_mutating_permissions() {
        // Viewing with a target attached does not trigger the pre-conditions.
        let context = ctx(OrganizationRole::Admin, None);
        let target = ProtectedTarget {
            user_id: context.principal.id.clone(),
            organization_role: OrganizationRole::Member,
        };
        let decision = decide(&context, &[Permission::ViewUsers], Mode::All, Some(&target));
        assert!(decision.allowed);
    }

    #[test]
    fn all_mode_requires_every_permission() {
        let context = ctx(OrganizationRole::Manager, None);
        // Manager can view users but not manage them.
        let decision = decide(
            &context,
            &[Permission::ViewUsers, Permission::ManageUsers],
            Mode::All,
            None,
        );
        assert!(!decision.allowed);

        let decision = decide(
            &context,
            &[Permission::ViewUsers, Permission::ViewProjects],
            Mode::All,
            None,
        );
        assert!(decision.allowed);
    }

    #[test]
    fn any_mode_accepts_one_grant_and_joins_reasons() {
        let context = ctx(OrganizationRole::Viewer, None);
        let decision = decide(
            &context,
            &[Permission::ManageUsers, Permission::ViewProjects],
            Mode::Any,
            None,
        );
        assert!(decision.allowed);

        let denied = decide(
            &context,
            &[Permission::ManageUsers, Permission::ManageOrganization],
            Mode::Any,
            None,
        );
        assert!(!denied.allowed);
        assert!(denied.reason.contains("manage-users"));
        assert!(denied.reason.contains("manage-organization"));
    }

    #[test]
    fn organization_only_permission_without_project_scope() {
        // view-users has no project-scope grant; a project admin without
        // org rank stays denied.
        let decision = decide_one(&ctx(OrganizationRole::Member, Some(ProjectRole::Owner)), Permission::ViewUsers);
        assert!(!decision.allowed);
        assert!(decision.reason.contains("organization role rank"));
    }

    #[test]
    fn organization_grants_are_monotone() {
        // Every permission granted to a lower role is granted to each higher one.
        let roles = [
            OrganizationRole::Viewer,
            OrganizationRole::Member,
            OrganizationRole::Manager,
            OrganizationRole::Admin,
        ];
        let permissions = [
            Permission::ViewProjects,
            Permission::ManageProject,
            Permission::ViewDocuments,
            Permission::EditDocuments,
            Permission::ViewUsers,
            Permission::ManageUsers,
            Permission::ManageOrganization,
        ];
        for window in roles.windows(2) {
            for permission in permissions {
                let lower = decide_one(&ctx(window[0], None), permission);
                let higher = decide_one(&ctx(window[1], None), permission);
                if lower.allowed {
                    assert!(higher.allowed, "{} lost {}", window[1], permission);
                }
            }
        }
    }
}
