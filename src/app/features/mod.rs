pub mod dashboard;
pub mod identity_webhook;
pub mod members;
pub mod memberships;
pub mod projects;
