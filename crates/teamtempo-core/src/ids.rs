//! Core identifier types for teamtempo.
//!
//! Every persisted entity is addressed by a UUID. Each entity kind gets its
//! own newtype so a team UUID can never be passed where a project UUID is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input was empty or only whitespace.
    #[error("UUID can not be empty or null")]
    Empty,

    /// The input is not a valid UUID.
    #[error("UUID {0} is invalid")]
    InvalidUuid(String),
}

/// Parse a UUID string, distinguishing blank input from malformed input.
fn parse_uuid(s: &str) -> Result<uuid::Uuid, IdError> {
    if s.trim().is_empty() {
        return Err(IdError::Empty);
    }
    uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid(s.to_string()))
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Create an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Return the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Return the bytes of the UUID.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_uuid(s).map(Self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_bytes()
            }
        }
    };
}

uuid_id!(
    /// Identifier of a registered user account.
    UserId
);

uuid_id!(
    /// Identifier of a team. Teams are owned by exactly one user.
    TeamId
);

uuid_id!(
    /// Identifier of a project within a team.
    ProjectId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_roundtrip() {
        let id = TeamId::generate();
        let parsed = TeamId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn blank_input_is_empty_error() {
        assert_eq!(UserId::from_str(""), Err(IdError::Empty));
        assert_eq!(ProjectId::from_str("   "), Err(IdError::Empty));
    }

    #[test]
    fn malformed_input_names_the_value() {
        let err = TeamId::from_str("not-a-uuid").unwrap_err();
        assert_eq!(err, IdError::InvalidUuid("not-a-uuid".to_string()));
        assert_eq!(err.to_string(), "UUID not-a-uuid is invalid");
    }

    #[test]
    fn empty_error_message() {
        assert_eq!(IdError::Empty.to_string(), "UUID can not be empty or null");
    }

    #[test]
    fn serde_json_uses_plain_string() {
        let uuid = uuid::Uuid::new_v4();
        let id = ProjectId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
        let parsed: ProjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn serde_json_rejects_invalid() {
        let result: Result<UserId, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }
}
