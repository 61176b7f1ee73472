use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Organization role enum. Ordered from most to least privileged.
///
/// `Root` is the organization-spanning role: it belongs to no single
/// organization (null organization id) and bypasses tenant scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")] // Serialize as lowercase string
#[strum(serialize_all = "lowercase")] // Display/FromStr as lowercase string
pub enum OrganizationRole {
    Root,
    Admin,
    Manager,
    Member,
    Viewer,
}

impl OrganizationRole {
    /// Privilege rank, larger = more privileged. Grants are monotone in rank.
    pub fn rank(self) -> u8 {
        match self {
            OrganizationRole::Root => 4,
            OrganizationRole::Admin => 3,
            OrganizationRole::Manager => 2,
            OrganizationRole::Member => 1,
            OrganizationRole::Viewer => 0,
        }
    }

    /// All roles, highest rank first. Used by catalog validation and tests.
    pub const ALL: [OrganizationRole; 5] = [
        OrganizationRole::Root,
        OrganizationRole::Admin,
        OrganizationRole::Manager,
        OrganizationRole::Member,
        OrganizationRole::Viewer,
    ];
}
