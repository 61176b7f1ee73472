pub mod organization_id;
pub mod organization_role;
pub mod permission;
pub mod project_id;
pub mod project_role;
pub mod project_status;
pub mod user_id;

pub use organization_id::OrganizationId;
pub use organization_role::OrganizationRole;
pub use permission::Permission;
pub use project_id::ProjectId;
pub use project_role::ProjectRole;
pub use project_status::ProjectStatus;
pub use user_id::UserId;
