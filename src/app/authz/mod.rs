//! Authorization core: role hierarchy and permission catalog, tenant-context
//! resolution, the pure decision engine, and the route guard that chains them
//! for one request.

pub mod catalog;
pub mod context;
pub mod dashboard;
pub mod decision;
pub mod guard;

pub use catalog::Scope;
pub use context::{Principal, ProjectMembership, ResourceRef, TenantContext};
pub use decision::{decide, decide_one, AuthorizationDecision, Mode, ProtectedTarget};
pub use guard::{authorize, authorize_user_mutation};
