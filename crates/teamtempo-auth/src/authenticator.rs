//! Credential login and logout.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use teamtempo_core::Principal;

use crate::context::SecurityContext;
use crate::directory::PrincipalDirectory;
use crate::error::{AuthError, Result};
use crate::password::{verify_blocking, PasswordEncoder};
use crate::token::TokenCodec;

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated principal.
    pub principal: Principal,
    /// Freshly issued access token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Acknowledgement returned by logout.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutAck {
    /// Human-readable confirmation.
    pub message: String,
    /// When the logout was processed.
    pub timestamp: DateTime<Utc>,
}

/// Verifies email/password credentials and issues access tokens.
pub struct CredentialAuthenticator<D> {
    directory: Arc<D>,
    passwords: Arc<dyn PasswordEncoder>,
    codec: Arc<TokenCodec>,
    ttl: TimeDelta,
}

impl<D: PrincipalDirectory> CredentialAuthenticator<D> {
    /// Create an authenticator issuing tokens valid for `ttl`.
    pub fn new(
        directory: Arc<D>,
        passwords: Arc<dyn PasswordEncoder>,
        codec: Arc<TokenCodec>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            directory,
            passwords,
            codec,
            ttl,
        }
    }

    /// Lifetime of issued tokens.
    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Authenticate `email`/`password` and issue a token.
    ///
    /// Every successful call mints a new, independent token.
    ///
    /// # Errors
    ///
    /// - `AuthError::UserNotFound` if no account has this email
    /// - `AuthError::AccountDisabled` if the account is disabled
    /// - `AuthError::BadCredentials` if the password does not match
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let account = self
            .directory
            .find_account(email)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(email.to_string()))?;

        if !account.principal.enabled {
            tracing::warn!(email = %email, "Login rejected for disabled account");
            return Err(AuthError::AccountDisabled(email.to_string()));
        }

        let matches = verify_blocking(
            Arc::clone(&self.passwords),
            password.to_string(),
            account.password_hash.clone(),
        )
        .await;
        if !matches {
            tracing::warn!(email = %email, "Login rejected: bad credentials");
            return Err(AuthError::BadCredentials);
        }

        let token = self.codec.issue(&account.principal.identifier, self.ttl)?;
        tracing::info!(email = %email, role = %account.principal.role, "User logged in");

        Ok(LoginOutcome {
            principal: account.principal,
            token,
            expires_in: self.ttl.num_seconds(),
        })
    }

    /// Clear the caller's security context.
    ///
    /// The token itself stays valid until it expires: there is no
    /// revocation list.
    pub fn logout(&self, context: &mut SecurityContext) -> LogoutAck {
        if let Some(principal) = context.principal() {
            tracing::info!(email = %principal.identifier, "User logged out");
        }
        context.clear();
        LogoutAck {
            message: "User successfully logged out".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::key::SigningKey;
    use crate::password::BcryptPasswordEncoder;
    use teamtempo_core::SecurityRole;

    struct Fixture {
        directory: Arc<InMemoryDirectory>,
        codec: Arc<TokenCodec>,
        auth: CredentialAuthenticator<InMemoryDirectory>,
    }

    fn fixture() -> Fixture {
        let encoder = BcryptPasswordEncoder::with_cost(4);
        let directory = Arc::new(InMemoryDirectory::new());
        let hash = encoder.hash_password("rightpw1").unwrap();
        directory.add_user("a@b.com", &hash, SecurityRole::User, true);
        directory.add_user("off@b.com", &hash, SecurityRole::User, false);

        let codec = Arc::new(TokenCodec::new(
            &SigningKey::from_bytes(vec![3u8; 32]).unwrap(),
        ));
        let auth = CredentialAuthenticator::new(
            directory.clone(),
            Arc::new(encoder),
            codec.clone(),
            TimeDelta::seconds(900),
        );
        Fixture {
            directory,
            codec,
            auth,
        }
    }

    #[tokio::test]
    async fn login_issues_token_for_email() {
        let f = fixture();
        let outcome = f.auth.login("a@b.com", "rightpw1").await.unwrap();

        assert_eq!(outcome.principal.identifier, "a@b.com");
        assert_eq!(outcome.expires_in, 900);
        assert_eq!(f.codec.extract_subject(&outcome.token).unwrap(), "a@b.com");
        assert!(!f.codec.is_expired(&outcome.token));
    }

    #[tokio::test]
    async fn wrong_password_is_bad_credentials() {
        let f = fixture();
        let err = f.auth.login("a@b.com", "wrongpw").await.unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
        assert_eq!(err.to_string(), "Bad credentials");
        assert_eq!(err.http_status_code(), 401);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let f = fixture();
        let err = f.auth.login("ghost@b.com", "rightpw1").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound(ref e) if e == "ghost@b.com"));
        assert_eq!(
            err.to_string(),
            "User ghost@b.com not found, please contact your admin"
        );
    }

    #[tokio::test]
    async fn disabled_account_is_checked_before_password() {
        let f = fixture();
        let err = f.auth.login("off@b.com", "wrongpw").await.unwrap_err();
        assert!(matches!(err, AuthError::AccountDisabled(_)));
        assert_eq!(err.http_status_code(), 401);
    }

    #[tokio::test]
    async fn login_does_not_modify_directory() {
        let f = fixture();
        f.auth.login("a@b.com", "rightpw1").await.unwrap();
        let account = f.directory.find_account("a@b.com").await.unwrap().unwrap();
        assert!(account.principal.enabled);
    }

    #[tokio::test]
    async fn logout_clears_context_but_token_stays_valid() {
        let f = fixture();
        let outcome = f.auth.login("a@b.com", "rightpw1").await.unwrap();

        let mut context = SecurityContext::new();
        context.authenticate(outcome.principal.clone());

        let ack = f.auth.logout(&mut context);
        assert_eq!(ack.message, "User successfully logged out");
        assert!(!context.is_authenticated());

        assert!(f
            .codec
            .validate_for(&outcome.token, &outcome.principal.identifier)
            .is_ok());
    }
}
