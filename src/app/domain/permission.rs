use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// A symbolic capability checked by the decision engine. Never persisted;
/// derived at decision time from the immutable catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Permission {
    ViewProjects,
    ManageProject,
    ViewDocuments,
    EditDocuments,
    ViewUsers,
    ManageUsers,
    ManageMembers,
    ManageOrganization,
}

impl Permission {
    /// True when granting this permission lets the holder mutate another
    /// user's role, membership, or existence. The decision engine runs its
    /// self-protection pre-conditions only for these.
    pub fn mutates_users(self) -> bool {
        matches!(self, Permission::ManageUsers | Permission::ManageMembers)
    }
}
