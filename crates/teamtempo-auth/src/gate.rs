//! Per-request bearer token authentication.

use std::sync::Arc;

use crate::context::SecurityContext;
use crate::directory::PrincipalDirectory;
use crate::error::{AuthError, Result};
use crate::token::TokenCodec;

/// Scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// What the gate did with a request.
#[derive(Debug)]
pub enum GateOutcome {
    /// No bearer token was presented.
    Anonymous,
    /// The context already held a principal; nothing was changed.
    AlreadyAuthenticated,
    /// The token was accepted and the context now holds its principal.
    Authenticated,
    /// The token was well formed but not accepted. The request continues
    /// unauthenticated.
    Rejected(AuthError),
}

/// Authenticates requests from their bearer token.
pub struct AuthenticationGate<D> {
    codec: Arc<TokenCodec>,
    directory: Arc<D>,
}

impl<D: PrincipalDirectory> AuthenticationGate<D> {
    /// Create a gate.
    pub fn new(codec: Arc<TokenCodec>, directory: Arc<D>) -> Self {
        Self { codec, directory }
    }

    /// Populate `context` from an `Authorization` header value.
    ///
    /// Validation failures are not errors: they leave the context empty so
    /// that authorization decides the response. Only a token that cannot
    /// be decoded at all aborts the request.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSignature` or `AuthError::MalformedToken`
    /// if the token does not decode, or `AuthError::Directory` if the
    /// principal lookup fails.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
        context: &mut SecurityContext,
    ) -> Result<GateOutcome> {
        let Some(token) = authorization.and_then(|h| h.strip_prefix(BEARER_PREFIX)) else {
            return Ok(GateOutcome::Anonymous);
        };

        let subject = self.codec.extract_subject(token)?;

        if context.is_authenticated() {
            return Ok(GateOutcome::AlreadyAuthenticated);
        }

        let Some(principal) = self.directory.find_principal_by_identifier(&subject).await? else {
            tracing::warn!(subject = %subject, "Token subject has no account");
            return Ok(GateOutcome::Rejected(AuthError::UserNotFound(subject)));
        };

        match self.codec.validate_for(token, &principal.identifier) {
            Ok(_) => {
                tracing::debug!(subject = %subject, role = %principal.role, "Request authenticated");
                context.authenticate(principal);
                Ok(GateOutcome::Authenticated)
            }
            Err(e) => {
                tracing::warn!(subject = %subject, error = %e, "Token rejected");
                Ok(GateOutcome::Rejected(e))
            }
        }
    }
}
