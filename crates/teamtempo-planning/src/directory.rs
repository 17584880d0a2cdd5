//! Account directory backed by the user store.

use std::sync::Arc;

use async_trait::async_trait;
use teamtempo_auth::{Account, AuthError, PrincipalDirectory};
use teamtempo_core::Principal;
use teamtempo_store::{Store, UserRecord};

/// [`PrincipalDirectory`] that resolves identifiers by email in a [`Store`].
pub struct StoreDirectory<S: Store> {
    store: Arc<S>,
}

impl<S: Store> StoreDirectory<S> {
    /// Create a directory over `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn account_from(user: UserRecord) -> Account {
    Account {
        principal: Principal {
            identifier: user.email,
            user_id: user.user_id,
            role: user.role,
            enabled: user.enabled,
        },
        password_hash: user.password_hash,
    }
}

#[async_trait]
impl<S: Store + 'static> PrincipalDirectory for StoreDirectory<S> {
    async fn find_account(&self, identifier: &str) -> teamtempo_auth::Result<Option<Account>> {
        let user = self
            .store
            .find_user_by_email(identifier)
            .map_err(|e| AuthError::Directory(e.to_string()))?;
        Ok(user.map(account_from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use teamtempo_core::{SecurityRole, UserId};
    use teamtempo_store::RocksStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn resolves_principal_by_email() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let now = Utc::now();
        let user = UserRecord {
            user_id: UserId::generate(),
            full_name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            password_hash: "hash".to_string(),
            enabled: false,
            role: SecurityRole::Admin,
            created_at: now,
            updated_at: now,
        };
        store.put_user(&user).unwrap();

        let directory = StoreDirectory::new(store);
        let principal = directory
            .find_principal_by_identifier("grace@example.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(principal.user_id, user.user_id);
        assert_eq!(principal.role, SecurityRole::Admin);
        assert!(!principal.enabled);

        let account = directory.find_account("grace@example.com").await.unwrap().unwrap();
        assert_eq!(account.password_hash, "hash");
        assert!(directory.find_account("nobody@example.com").await.unwrap().is_none());
    }
}
