//! Signing key material.
//!
//! The key is decoded once at startup from a base64 secret and shared
//! read-only for the life of the process.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::error::{AuthError, Result};

/// Symmetric HMAC key used to sign and verify access tokens.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Vec<u8>,
    algorithm: Algorithm,
}

impl SigningKey {
    /// Smallest accepted key, in bytes (256 bits).
    pub const MIN_LEN: usize = 32;

    /// Decode a base64 secret into a signing key.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::KeyMaterial` if the secret is not valid base64 or
    /// decodes to fewer than [`Self::MIN_LEN`] bytes.
    pub fn from_base64(secret: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(secret.trim())
            .map_err(|e| AuthError::KeyMaterial(format!("secret is not valid base64: {e}")))?;
        Self::from_bytes(bytes)
    }

    /// Build a signing key from raw bytes.
    ///
    /// The HMAC variant follows the key length: 64 bytes and up select
    /// HS512, 48 and up HS384, otherwise HS256.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::KeyMaterial` if the key is shorter than
    /// [`Self::MIN_LEN`] bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let algorithm = match bytes.len() {
            n if n >= 64 => Algorithm::HS512,
            n if n >= 48 => Algorithm::HS384,
            n if n >= Self::MIN_LEN => Algorithm::HS256,
            n => {
                return Err(AuthError::KeyMaterial(format!(
                    "key is {} bits, at least {} bits are required",
                    n * 8,
                    Self::MIN_LEN * 8
                )))
            }
        };
        Ok(Self { bytes, algorithm })
    }

    /// The HMAC algorithm selected for this key.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.bytes)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.bytes)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("bits", &(self.bytes.len() * 8))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_of(len: usize) -> String {
        STANDARD.encode(vec![7u8; len])
    }

    #[test]
    fn algorithm_follows_key_length() {
        assert_eq!(SigningKey::from_base64(&secret_of(32)).unwrap().algorithm(), Algorithm::HS256);
        assert_eq!(SigningKey::from_base64(&secret_of(47)).unwrap().algorithm(), Algorithm::HS256);
        assert_eq!(SigningKey::from_base64(&secret_of(48)).unwrap().algorithm(), Algorithm::HS384);
        assert_eq!(SigningKey::from_base64(&secret_of(64)).unwrap().algorithm(), Algorithm::HS512);
        assert_eq!(SigningKey::from_base64(&secret_of(128)).unwrap().algorithm(), Algorithm::HS512);
    }

    #[test]
    fn weak_key_is_rejected() {
        let err = SigningKey::from_base64(&secret_of(31)).unwrap_err();
        assert!(matches!(err, AuthError::KeyMaterial(msg) if msg.contains("248 bits")));
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(matches!(
            SigningKey::from_base64("not base64!!"),
            Err(AuthError::KeyMaterial(_))
        ));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let key = SigningKey::from_base64(&format!("  {}\n", secret_of(32))).unwrap();
        assert_eq!(key.algorithm(), Algorithm::HS256);
    }

    #[test]
    fn debug_does_not_print_key_bytes() {
        let key = SigningKey::from_bytes(vec![0xAB; 32]).unwrap();
        let printed = format!("{key:?}");
        assert!(printed.contains("HS256"));
        assert!(!printed.contains("171"));
    }
}
