//! One-way password hashing.

use std::sync::Arc;

use crate::error::{AuthError, Result};

/// Hashes and verifies account passwords.
pub trait PasswordEncoder: Send + Sync {
    /// Hash a plaintext password for storage.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if hashing fails.
    fn hash_password(&self, plain: &str) -> Result<String>;

    /// Whether `plain` matches a stored `hash`.
    ///
    /// A hash in an unrecognised format never matches.
    fn verify_password(&self, plain: &str, hash: &str) -> bool;
}

/// bcrypt-backed [`PasswordEncoder`].
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    /// Work factor used for new hashes.
    pub const DEFAULT_COST: u32 = 10;

    /// Create an encoder with the default work factor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cost: Self::DEFAULT_COST,
        }
    }

    /// Create an encoder with a custom work factor (4 to 31).
    #[must_use]
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordEncoder for BcryptPasswordEncoder {
    fn hash_password(&self, plain: &str) -> Result<String> {
        bcrypt::hash(plain, self.cost).map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn verify_password(&self, plain: &str, hash: &str) -> bool {
        match bcrypt::verify(plain, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a bcrypt hash");
                false
            }
        }
    }
}

/// Hash on the blocking pool so bcrypt does not stall a runtime worker.
///
/// # Errors
///
/// Returns `AuthError::Signing` if hashing fails or the task is cancelled.
pub async fn hash_blocking(encoder: Arc<dyn PasswordEncoder>, plain: String) -> Result<String> {
    tokio::task::spawn_blocking(move || encoder.hash_password(&plain))
        .await
        .map_err(|e| AuthError::Signing(format!("password hashing task failed: {e}")))?
}

/// Verify on the blocking pool. A failed task counts as a mismatch.
pub async fn verify_blocking(
    encoder: Arc<dyn PasswordEncoder>,
    plain: String,
    hash: String,
) -> bool {
    match tokio::task::spawn_blocking(move || encoder.verify_password(&plain, &hash)).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!(error = %e, "Password verification task failed");
            false
        }
    }
}
