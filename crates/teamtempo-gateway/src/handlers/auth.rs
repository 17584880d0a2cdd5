//! Login, signup, and logout endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use teamtempo_auth::{LogoutAck, PrincipalDirectory};
use teamtempo_core::SecurityRole;
use teamtempo_planning::{Planning, SignupRequest, UserView};

use crate::auth::RequestContext;
use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::state::GatewayState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Login credentials.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    /// Account email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Account email, also the token subject.
    pub email: String,
    /// Account role.
    pub role: SecurityRole,
    /// Bearer token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Exchange email and password for a bearer token.
///
/// `POST /auth/login`
///
/// # Errors
///
/// Returns 401 for a wrong password or a disabled account.
pub async fn login<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    let outcome = state
        .authenticator
        .login(&body.email, &body.password)
        .await?;

    Ok(Json(LoginResponse {
        email: outcome.principal.identifier,
        role: outcome.principal.role,
        token: outcome.token,
        expires_in: outcome.expires_in,
    }))
}

/// Register a new account.
///
/// `POST /auth/signup`
///
/// # Errors
///
/// Returns 422 for invalid fields or an email already in use.
pub async fn signup<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    ApiJson(body): ApiJson<SignupRequest>,
) -> Result<Json<UserView>, ApiError>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    let user = state.planning.sign_up(body).await?;
    Ok(Json(user))
}

/// Clear the caller's security context.
///
/// `POST /auth/logout`
///
/// The bearer token itself stays valid until it expires.
pub async fn logout<C, D>(
    State(state): State<Arc<GatewayState<C, D>>>,
    RequestContext(mut context): RequestContext,
) -> Json<LogoutAck>
where
    C: Planning + 'static,
    D: PrincipalDirectory + 'static,
{
    Json(state.authenticator.logout(&mut context))
}
