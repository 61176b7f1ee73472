//! Default landing path per organization role.
//!
//! UI convenience only: an unknown role symbol falls back to the
//! least-privileged path instead of erroring, because access enforcement
//! always happens in the decision engine, never here.

use crate::app::domain::OrganizationRole;

/// Least-privileged default, also the fallback for unknown symbols.
const DEFAULT_PATH: &str = "/app/library";

/// Default landing path for a resolved organization role. Total over the
/// role set.
pub fn landing_path(role: OrganizationRole) -> &'static str {
    match role {
        OrganizationRole::Root => "/app/platform",
        OrganizationRole::Admin => "/app/organization",
        OrganizationRole::Manager | OrganizationRole::Member => "/app/projects",
        OrganizationRole::Viewer => DEFAULT_PATH,
    }
}

/// Landing path from a raw role symbol, e.g. a value a client echoed back.
pub fn landing_path_for_symbol(symbol: &str) -> &'static str {
    symbol
        .parse::<OrganizationRole>()
        .map(landing_path)
        .unwrap_or(DEFAULT_PATH)
}
