//! Account lookup used by login and request authentication.

use async_trait::async_trait;
use teamtempo_core::Principal;

use crate::error::Result;

/// A principal together with its stored password hash.
#[derive(Debug, Clone)]
pub struct Account {
    /// The identity this account authenticates as.
    pub principal: Principal,
    /// One-way password hash.
    pub password_hash: String,
}

/// Resolves login identifiers to accounts.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Find an account by exact identifier.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Directory` if the backing store fails.
    async fn find_account(&self, identifier: &str) -> Result<Option<Account>>;

    /// Find the principal for an identifier without its credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Directory` if the backing store fails.
    async fn find_principal_by_identifier(&self, identifier: &str) -> Result<Option<Principal>> {
        Ok(self.find_account(identifier).await?.map(|a| a.principal))
    }
}

/// Directory backed by a map, for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    accounts: parking_lot::RwLock<std::collections::HashMap<String, Account>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl InMemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account.
    pub fn insert(&self, account: Account) {
        self.accounts
            .write()
            .insert(account.principal.identifier.clone(), account);
    }

    /// Insert an account with a freshly generated user id.
    pub fn add_user(
        &self,
        identifier: &str,
        password_hash: &str,
        role: teamtempo_core::SecurityRole,
        enabled: bool,
    ) -> Principal {
        let principal = Principal {
            identifier: identifier.to_string(),
            user_id: teamtempo_core::UserId::generate(),
            role,
            enabled,
        };
        self.insert(Account {
            principal: principal.clone(),
            password_hash: password_hash.to_string(),
        });
        principal
    }

    /// Remove an account.
    pub fn remove(&self, identifier: &str) {
        self.accounts.write().remove(identifier);
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl PrincipalDirectory for InMemoryDirectory {
    async fn find_account(&self, identifier: &str) -> Result<Option<Account>> {
        Ok(self.accounts.read().get(identifier).cloned())
    }
}
