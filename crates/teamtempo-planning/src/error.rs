//! Error types for planning operations.

use teamtempo_core::IdError;
use thiserror::Error;

/// A result type using `PlanningError`.
pub type Result<T> = std::result::Result<T, PlanningError>;

/// Errors that can occur in planning operations.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// A request parameter is missing or malformed.
    #[error("{0}")]
    InvalidParameter(String),

    /// The requested record does not exist for this caller.
    #[error("{0}")]
    NotFound(String),

    /// A field failed validation.
    #[error("{0}")]
    EntityValidation(String),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] teamtempo_store::StoreError),

    /// Password hashing failed.
    #[error("authentication error: {0}")]
    Auth(#[from] teamtempo_auth::AuthError),
}

impl From<IdError> for PlanningError {
    fn from(e: IdError) -> Self {
        Self::InvalidParameter(e.to_string())
    }
}

impl PlanningError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidParameter(_) => 400,
            Self::NotFound(_) => 404,
            Self::EntityValidation(_) => 422,
            Self::Store(_) => 500,
            Self::Auth(e) => e.http_status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(PlanningError::InvalidParameter("x".into()).http_status_code(), 400);
        assert_eq!(PlanningError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(PlanningError::EntityValidation("x".into()).http_status_code(), 422);
        assert_eq!(
            PlanningError::Store(teamtempo_store::StoreError::NotFound).http_status_code(),
            500
        );
    }

    #[test]
    fn id_errors_become_invalid_parameters() {
        let err = PlanningError::from(IdError::InvalidUuid("abc".into()));
        assert!(matches!(err, PlanningError::InvalidParameter(ref m) if m == "UUID abc is invalid"));
    }
}
