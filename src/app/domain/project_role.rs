use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Project role enum, assigned through a membership row. Its rank order is
/// independent of the organization role order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectRole {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl ProjectRole {
    /// Privilege rank, larger = more privileged.
    pub fn rank(self) -> u8 {
        match self {
            ProjectRole::Owner => 3,
            ProjectRole::Admin => 2,
            ProjectRole::Member => 1,
            ProjectRole::Viewer => 0,
        }
    }

    /// All roles, highest rank first.
    pub const ALL: [ProjectRole; 4] = [
        ProjectRole::Owner,
        ProjectRole::Admin,
        ProjectRole::Member,
        ProjectRole::Viewer,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_form_strict_total_order() {
        for pair in ProjectRole::ALL.windows(2) {
            assert!(pair[0].rank() > pair[1].rank());
        }
    }
}
