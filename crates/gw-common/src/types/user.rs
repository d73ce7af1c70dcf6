//! Application roles

use serde::{Deserialize, Serialize};

/// Role of an authenticated caller.
///
/// Stored as the `usr_admin` level: 0 user, 1 curator, 2 and above admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    #[default]
    User,
    Curator,
    Admin,
}

impl AppRole {
    pub fn from_admin_level(level: i32) -> Self {
        match level {
            i32::MIN..=0 => AppRole::User,
            1 => AppRole::Curator,
            _ => AppRole::Admin,
        }
    }

    /// Curators and admins may annotate genesets they do not own.
    pub fn can_curate(self) -> bool {
        matches!(self, AppRole::Curator | AppRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_levels() {
        assert_eq!(AppRole::from_admin_level(0), AppRole::User);
        assert_eq!(AppRole::from_admin_level(1), AppRole::Curator);
        assert_eq!(AppRole::from_admin_level(3), AppRole::Admin);
        assert!(!AppRole::User.can_curate());
        assert!(AppRole::Curator.can_curate());
    }
}
