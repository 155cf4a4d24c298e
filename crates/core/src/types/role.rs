//! Admin roles and their permission ordering.

use serde::{Deserialize, Serialize};

/// Role attached to an admin identity.
///
/// `Editor` covers day-to-day back-office work (catalog edits, order status
/// changes). `Admin` additionally unlocks sensitive reads and destructive
/// operations (raw contact messages, order deletion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    Editor,
}

impl AdminRole {
    /// Human-facing label shown in the back-office UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrateur",
            Self::Editor => "Éditeur",
        }
    }

    /// Whether this role satisfies a minimum-role requirement.
    ///
    /// `Admin` satisfies every requirement; `Editor` only satisfies
    /// `Editor`.
    #[must_use]
    pub const fn meets(self, minimum: Self) -> bool {
        match minimum {
            Self::Editor => true,
            Self::Admin => matches!(self, Self::Admin),
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Editor => write!(f, "editor"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meets_ordering() {
        assert!(AdminRole::Admin.meets(AdminRole::Admin));
        assert!(AdminRole::Admin.meets(AdminRole::Editor));
        assert!(AdminRole::Editor.meets(AdminRole::Editor));
        assert!(!AdminRole::Editor.meets(AdminRole::Admin));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("admin".parse::<AdminRole>(), Ok(AdminRole::Admin));
        assert_eq!("editor".parse::<AdminRole>(), Ok(AdminRole::Editor));
        assert!("viewer".parse::<AdminRole>().is_err());
        assert_eq!(AdminRole::Editor.to_string(), "editor");
    }

    #[test]
    fn test_labels() {
        assert_eq!(AdminRole::Admin.label(), "Administrateur");
        assert_eq!(AdminRole::Editor.label(), "Éditeur");
    }
}
