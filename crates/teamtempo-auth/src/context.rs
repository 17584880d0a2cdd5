//! Request-scoped security context.

use teamtempo_core::Principal;

/// Holds the principal a single request acts as, if any.
///
/// A fresh, empty context is created for every request and dropped with
/// it. Nothing is shared across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    principal: Option<Principal>,
}

impl SecurityContext {
    /// An unauthenticated context.
    #[must_use]
    pub const fn new() -> Self {
        Self { principal: None }
    }

    /// Set the authenticated principal.
    pub fn authenticate(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }

    /// The authenticated principal, if any.
    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Whether a principal has been set.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Drop the principal.
    pub fn clear(&mut self) {
        self.principal = None;
    }
}
