//! Admin identity domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gala_core::{AdminId, AdminRole, Email};

/// An admin back-office account.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminId,
    pub name: String,
    pub email: Email,
    pub role: AdminRole,
    /// Deactivated accounts keep their row but can no longer log in or use
    /// existing tokens.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The identity projection attached to authenticated requests and returned
/// by login and `GET /user`. Deliberately excludes the credential hash and
/// the active flag.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentAdmin {
    pub id: AdminId,
    pub name: String,
    pub email: Email,
    pub role: AdminRole,
    pub role_label: String,
}

impl From<AdminUser> for CurrentAdmin {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            role_label: user.role.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_carries_role_label() {
        let now = Utc::now();
        let user = AdminUser {
            id: AdminId::new(1),
            name: "Awa".to_string(),
            email: Email::parse("awa@exemple.ci").expect("valid email"),
            role: AdminRole::Editor,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let current = CurrentAdmin::from(user);
        assert_eq!(current.role, AdminRole::Editor);
        assert_eq!(current.role_label, "Éditeur");
    }
}
