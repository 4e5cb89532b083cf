//! Static role hierarchy: ADMIN ⊇ EDITOR ⊇ CONTRIBUTOR ⊇ VIEWER.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Editor,
    Contributor,
    Viewer,
}

impl Role {
    const fn rank(self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Editor => 2,
            Role::Contributor => 1,
            Role::Viewer => 0,
        }
    }

    /// Whether a caller holding this role satisfies an endpoint requiring
    /// `required`. Pure; the hierarchy is fixed at compile time.
    pub const fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Editor => write!(f, "EDITOR"),
            Role::Contributor => write!(f, "CONTRIBUTOR"),
            Role::Viewer => write!(f, "VIEWER"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "EDITOR" => Ok(Role::Editor),
            "CONTRIBUTOR" => Ok(Role::Contributor),
            "VIEWER" => Ok(Role::Viewer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Role; 4] = [Role::Admin, Role::Editor, Role::Contributor, Role::Viewer];

    #[test]
    fn test_reflexive() {
        for role in ALL {
            assert!(role.satisfies(role));
        }
    }

    #[test]
    fn test_transitive_order() {
        assert!(Role::Admin.satisfies(Role::Viewer));
        assert!(Role::Admin.satisfies(Role::Contributor));
        assert!(Role::Admin.satisfies(Role::Editor));
        assert!(Role::Editor.satisfies(Role::Contributor));
        assert!(Role::Editor.satisfies(Role::Viewer));
        assert!(Role::Contributor.satisfies(Role::Viewer));

        assert!(!Role::Viewer.satisfies(Role::Admin));
        assert!(!Role::Viewer.satisfies(Role::Contributor));
        assert!(!Role::Contributor.satisfies(Role::Editor));
        assert!(!Role::Editor.satisfies(Role::Admin));
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Editor).unwrap(), "\"EDITOR\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"VIEWER\"").unwrap(),
            Role::Viewer
        );
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("ROOT".parse::<Role>().is_err());
    }
}
