//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use teamtempo_auth::{AuthenticationGate, CredentialAuthenticator, PrincipalDirectory, RuleTable};
use teamtempo_planning::Planning;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// Everything here is immutable after startup, so handlers read it
/// concurrently without locking.
pub struct GatewayState<C, D>
where
    C: Planning,
    D: PrincipalDirectory,
{
    /// Accounts, teams, and projects.
    pub planning: Arc<C>,
    /// Credential login and logout.
    pub authenticator: Arc<CredentialAuthenticator<D>>,
    /// Bearer token authentication.
    pub gate: Arc<AuthenticationGate<D>>,
    /// Ordered route authorization rules.
    pub rules: Arc<RuleTable>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<C, D> GatewayState<C, D>
where
    C: Planning,
    D: PrincipalDirectory,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(
        planning: Arc<C>,
        authenticator: Arc<CredentialAuthenticator<D>>,
        gate: Arc<AuthenticationGate<D>>,
        rules: RuleTable,
        config: GatewayConfig,
    ) -> Self {
        Self {
            planning,
            authenticator,
            gate,
            rules: Arc::new(rules),
            config,
        }
    }
}

impl<C, D> Clone for GatewayState<C, D>
where
    C: Planning,
    D: PrincipalDirectory,
{
    fn clone(&self) -> Self {
        Self {
            planning: Arc::clone(&self.planning),
            authenticator: Arc::clone(&self.authenticator),
            gate: Arc::clone(&self.gate),
            rules: Arc::clone(&self.rules),
            config: self.config.clone(),
        }
    }
}
