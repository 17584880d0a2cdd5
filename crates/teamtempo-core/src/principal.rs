//! Authenticated identities and their roles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::UserId;

/// Role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecurityRole {
    /// Regular account. Assigned at signup.
    #[default]
    User,
    /// Administrative account.
    Admin,
}

impl SecurityRole {
    /// All roles, in declaration order.
    pub const ALL: [Self; 2] = [Self::User, Self::Admin];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for SecurityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity a request acts as once its token has been accepted.
///
/// Principals are read from the user store and never mutated while a
/// request is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Subject identifier carried in tokens. This is the account email.
    pub identifier: String,
    /// Store identifier of the account.
    pub user_id: UserId,
    /// Role used by authorization rules.
    pub role: SecurityRole,
    /// Disabled accounts cannot log in.
    pub enabled: bool,
}

impl Principal {
    /// Whether this principal holds one of `roles`.
    #[must_use]
    pub fn has_any_role(&self, roles: &[SecurityRole]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&SecurityRole::Admin).unwrap(), "\"ADMIN\"");
        let role: SecurityRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, SecurityRole::User);
    }

    #[test]
    fn role_displays_wire_name() {
        assert_eq!(SecurityRole::Admin.to_string(), "ADMIN");
        assert_eq!(SecurityRole::User.to_string(), "USER");
    }

    #[test]
    fn has_any_role() {
        let principal = Principal {
            identifier: "a@b.com".to_string(),
            user_id: UserId::generate(),
            role: SecurityRole::User,
            enabled: true,
        };
        assert!(principal.has_any_role(&SecurityRole::ALL));
        assert!(!principal.has_any_role(&[SecurityRole::Admin]));
        assert!(!principal.has_any_role(&[]));
    }
}
