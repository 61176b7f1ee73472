//! Role hierarchy and permission catalog.
//!
//! The catalog is loaded once at process start from a fixed symbolic table
//! and never mutated afterward, so concurrent reads need no synchronization.
//! Unknown role or permission symbols fail the load; nothing is silently
//! defaulted.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::app::domain::{OrganizationRole, Permission, ProjectRole};

/// The level at which a grant is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Organization,
    Project,
}

/// Fixed grant table: (permission, scope, minimum role at that scope).
/// A permission absent from a scope is unsatisfiable there.
const GRANTS: &[(&str, &str, &str)] = &[
    ("view-projects", "organization", "viewer"),
    ("view-projects", "project", "viewer"),
    ("manage-project", "organization", "admin"),
    ("manage-project", "project", "admin"),
    ("view-documents", "organization", "viewer"),
    ("view-documents", "project", "viewer"),
    ("edit-documents", "organization", "member"),
    ("edit-documents", "project", "member"),
    ("view-users", "organization", "manager"),
    ("manage-users", "organization", "admin"),
    ("manage-members", "organization", "admin"),
    ("manage-members", "project", "admin"),
    ("manage-organization", "organization", "admin"),
];

/// Immutable permission catalog mapping each permission to the minimum rank
/// required at each scope.
#[derive(Debug)]
pub struct PermissionCatalog {
    organization_minimums: HashMap<Permission, u8>,
    project_minimums: HashMap<Permission, u8>,
}

impl PermissionCatalog {
    /// Parse the fixed grant table. Any unknown permission, scope, or role
    /// symbol is an error; callers treat that as fatal at startup.
    pub fn load() -> Result<Self, String> {
        let mut organization_minimums = HashMap::new();
        let mut project_minimums = HashMap::new();

        for (permission_symbol, scope_symbol, role_symbol) in GRANTS {
            let permission = permission_symbol
                .parse::<Permission>()
                .map_err(|_| format!("unknown permission symbol: {}", permission_symbol))?;

            let (rank, minimums) = match *scope_symbol {
                "organization" => {
                    let role = role_symbol
                        .parse::<OrganizationRole>()
                        .map_err(|_| format!("unknown organization role symbol: {}", role_symbol))?;
                    (role.rank(), &mut organization_minimums)
                }
                "project" => {
                    let role = role_symbol
                        .parse::<ProjectRole>()
                        .map_err(|_| format!("unknown project role symbol: {}", role_symbol))?;
                    (role.rank(), &mut project_minimums)
                }
                other => return Err(format!("unknown scope symbol: {}", other)),
            };

            if minimums.insert(permission, rank).is_some() {
                return Err(format!(
                    "duplicate grant entry for {} at {} scope",
                    permission_symbol, scope_symbol
                ));
            }
        }

        Ok(Self {
            organization_minimums,
            project_minimums,
        })
    }

    /// Lowest rank in the scope's role family that satisfies the permission,
    /// or None when the permission is unsatisfiable at this scope.
    pub fn minimum_rank(&self, permission: Permission, scope: Scope) -> Option<u8> {
        match scope {
            Scope::Organization => self.organization_minimums.get(&permission).copied(),
            Scope::Project => self.project_minimums.get(&permission).copied(),
        }
    }
}

static CATALOG: LazyLock<PermissionCatalog> = LazyLock::new(|| {
    PermissionCatalog::load().expect("permission catalog table contains an unknown symbol")
});

/// Shared catalog instance. First use forces the load; a bad table aborts
/// the process rather than serving decisions from a partial catalog.
pub fn catalog() -> &'static PermissionCatalog {
    &CATALOG
}
