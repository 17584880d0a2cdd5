//! Access token issuing and verification.
//!
//! Tokens are compact HMAC-signed JWTs carrying `sub`, `iat`, and `exp`.
//! Nothing about an issued token is stored server side; every request
//! re-derives validity from the token itself.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};
use crate::key::SigningKey;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier (the account email).
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// Whether the token is expired at `now`.
    ///
    /// A token is valid strictly before `exp`; the second equal to `exp`
    /// is already expired.
    #[must_use]
    pub const fn is_expired_at(&self, now_secs: i64) -> bool {
        self.exp <= now_secs
    }
}

/// Issues and verifies access tokens with the process signing key.
pub struct TokenCodec {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec for the given key.
    #[must_use]
    pub fn new(key: &SigningKey) -> Self {
        let algorithm = key.algorithm();

        let mut validation = Validation::new(algorithm);
        // Expiry is checked separately so decode can surface claims of
        // expired tokens.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["sub".to_string(), "exp".to_string()]);

        Self {
            header: Header::new(algorithm),
            encoding: key.encoding_key(),
            decoding: key.decoding_key(),
            validation,
        }
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if the expiry overflows or signing fails.
    pub fn issue(&self, subject: &str, ttl: TimeDelta) -> Result<String> {
        self.issue_at(subject, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if the expiry overflows or signing fails.
    pub fn issue_at(&self, subject: &str, ttl: TimeDelta, now: DateTime<Utc>) -> Result<String> {
        let iat = now.timestamp();
        let exp = iat
            .checked_add(ttl.num_seconds())
            .ok_or_else(|| AuthError::Signing("token expiry overflows".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp,
        };

        jsonwebtoken::encode(&self.header, &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Parse a token and verify its signature.
    ///
    /// Expiry is not checked here; see [`Self::is_expired`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSignature` if the signature does not
    /// verify against the signing key, or `AuthError::MalformedToken` if
    /// the token cannot be parsed.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::MalformedToken(e.to_string()),
            })
    }

    /// Return the `sub` claim of a verified token.
    ///
    /// # Errors
    ///
    /// Same as [`Self::decode`].
    pub fn extract_subject(&self, token: &str) -> Result<String> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Whether the token is expired now.
    ///
    /// Tokens that fail to decode are reported as expired.
    #[must_use]
    pub fn is_expired(&self, token: &str) -> bool {
        self.is_expired_at(token, Utc::now())
    }

    /// Whether the token is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.decode(token)
            .map_or(true, |claims| claims.is_expired_at(now.timestamp()))
    }

    /// Check that `token` was issued to `identifier` and has not expired.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SubjectMismatch` or `AuthError::TokenExpired`,
    /// or any error from [`Self::decode`].
    pub fn validate_for(&self, token: &str, identifier: &str) -> Result<Claims> {
        self.validate_for_at(token, identifier, Utc::now())
    }

    /// [`Self::validate_for`] evaluated at `now`.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_for`].
    pub fn validate_for_at(
        &self,
        token: &str,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims> {
        let claims = self.decode(token)?;
        if claims.sub != identifier {
            return Err(AuthError::SubjectMismatch);
        }
        if claims.is_expired_at(now.timestamp()) {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.header.alg)
            .finish_non_exhaustive()
    }
}
