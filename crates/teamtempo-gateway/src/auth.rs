//! Authentication middleware and extractors.
//!
//! Two middleware run on every routed request, strictly in this order:
//!
//! 1. [`authenticate`] resolves the bearer token into a request-scoped
//!    [`SecurityContext`] stored in the request extensions.
//! 2. [`authorize`] evaluates the [`RuleTable`](teamtempo_auth::RuleTable)
//!    against that context.
//!
//! Handlers read the principal back through [`CurrentPrincipal`].

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use teamtempo_auth::{AccessDecision, PrincipalDirectory, SecurityContext};
use teamtempo_core::Principal;
use teamtempo_planning::Planning;

use crate::error::ApiError;
use crate::state::GatewayState;

/// Resolve the `Authorization` header into a [`SecurityContext`].
///
/// A missing header, or a token the gate downgrades, leaves the context
/// empty and the request continues. A token that cannot be decoded ends
/// the request here.
///
/// # Errors
///
/// Returns the translated gate error for undecodable tokens.
pub async fn authenticate<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut context = request
        .extensions_mut()
        .remove::<SecurityContext>()
        .unwrap_or_default();

    let outcome = state.gate.authenticate(header.as_deref(), &mut context).await?;
    tracing::trace!(?outcome, path = %request.uri().path(), "Gate finished");

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Apply the rule table to the request.
///
/// # Errors
///
/// Returns `ApiError::Unauthenticated` when the matched rule needs a
/// principal and there is none, and `ApiError::Forbidden` when the
/// principal lacks the role.
pub async fn authorize<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    let anonymous = SecurityContext::new();
    let context = request
        .extensions()
        .get::<SecurityContext>()
        .unwrap_or(&anonymous);

    let decision = state
        .rules
        .evaluate(request.method(), request.uri().path(), context);

    match decision {
        AccessDecision::Granted => Ok(next.run(request).await),
        AccessDecision::Unauthenticated => Err(ApiError::Unauthenticated),
        AccessDecision::Forbidden => Err(ApiError::Forbidden),
    }
}

/// The authenticated principal of the current request.
///
/// Rejects with 401 when the request carries no principal.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .and_then(SecurityContext::principal)
            .cloned()
            .map(Self)
            .ok_or(ApiError::Unauthenticated)
    }
}

/// The request's own [`SecurityContext`], taken out of the extensions.
///
/// Empty when the authentication middleware did not run.
#[derive(Debug, Default)]
pub struct RequestContext(pub SecurityContext);

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .remove::<SecurityContext>()
                .unwrap_or_default(),
        ))
    }
}
