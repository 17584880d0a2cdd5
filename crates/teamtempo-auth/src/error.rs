//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account exists for the login identifier.
    #[error("User {0} not found, please contact your admin")]
    UserNotFound(String),

    /// The account exists but has been disabled.
    #[error("User {0} is inactive, please contact your admin")]
    AccountDisabled(String),

    /// The password did not match the stored hash.
    #[error("Bad credentials")]
    BadCredentials,

    /// The token signature does not match the signing key.
    #[error("JWT signature does not match locally computed signature")]
    InvalidSignature,

    /// The token has expired.
    #[error("JWT expired")]
    TokenExpired,

    /// The token subject does not belong to the resolved principal.
    #[error("token subject does not match principal")]
    SubjectMismatch,

    /// The token could not be parsed.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The configured signing secret is unusable.
    #[error("invalid key material: {0}")]
    KeyMaterial(String),

    /// Signing a token or hashing a password failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The account directory could not be queried.
    #[error("directory lookup failed: {0}")]
    Directory(String),
}

impl AuthError {
    /// Returns the appropriate HTTP status code for this error.
    ///
    /// An expired token surfaces as 500, not 401. Unknown login identifiers
    /// are not classified either and fall through to 500.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::AccountDisabled(_) | Self::BadCredentials | Self::SubjectMismatch => 401,
            Self::InvalidSignature => 403,
            Self::UserNotFound(_)
            | Self::TokenExpired
            | Self::MalformedToken(_)
            | Self::KeyMaterial(_)
            | Self::Signing(_)
            | Self::Directory(_) => 500,
        }
    }
}
