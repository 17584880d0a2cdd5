//! API error types and responses.
//!
//! Every failure leaving the gateway is translated here into a status code
//! and an `application/problem+json` body.

use axum::extract::rejection::JsonRejection;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use teamtempo_auth::AuthError;
use teamtempo_planning::PlanningError;

/// Content type of problem responses.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Message sent when a route requires a principal and none is present.
pub const UNAUTHENTICATED_MESSAGE: &str = "Full authentication is required to access this resource";

/// Message sent when the principal lacks the required role.
pub const FORBIDDEN_MESSAGE: &str = "Access Denied";

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A parameter or request body is malformed.
    #[error("{0}")]
    InvalidParameter(String),

    /// A field failed validation.
    #[error("{0}")]
    EntityValidation(String),

    /// The requested resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// Login password did not match.
    #[error("{0}")]
    BadCredentials(String),

    /// Login attempted on a disabled account.
    #[error("{0}")]
    AccountDisabled(String),

    /// Any other account status problem.
    #[error("{0}")]
    AccountStatus(String),

    /// Token signature does not match the signing key.
    #[error("{0}")]
    InvalidSignature(String),

    /// Token expired while being decoded.
    #[error("{0}")]
    TokenExpired(String),

    /// The route requires a principal and none is present.
    #[error("Full authentication is required to access this resource")]
    Unauthenticated,

    /// The principal lacks the required role.
    #[error("Access Denied")]
    Forbidden,

    /// Anything unclassified.
    #[error("{0}")]
    Internal(String),
}

/// Problem body returned for every error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemResponse {
    /// Numeric HTTP status.
    pub status_code: u16,
    /// Canonical reason phrase of the status.
    pub reason_phrase: &'static str,
    /// Error message.
    pub title: String,
    /// Error message.
    pub details: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::EntityValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadCredentials(_) | Self::AccountDisabled(_) | Self::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccountStatus(_) | Self::InvalidSignature(_) | Self::Forbidden => {
                StatusCode::FORBIDDEN
            }
            Self::TokenExpired(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the problem body for this error.
    #[must_use]
    pub fn problem(&self) -> ProblemResponse {
        let status = self.status_code();
        let message = self.to_string();
        ProblemResponse {
            status_code: status.as_u16(),
            reason_phrase: status.canonical_reason().unwrap_or("Unknown"),
            title: message.clone(),
            details: message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        match serde_json::to_vec(&self.problem()) {
            Ok(body) => (
                status,
                [(CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON))],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode problem body");
                status.into_response()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::BadCredentials => Self::BadCredentials(message),
            AuthError::AccountDisabled(_) => Self::AccountDisabled(message),
            AuthError::SubjectMismatch => Self::Unauthenticated,
            AuthError::InvalidSignature => Self::InvalidSignature(message),
            AuthError::TokenExpired => Self::TokenExpired(message),
            AuthError::UserNotFound(_)
            | AuthError::MalformedToken(_)
            | AuthError::KeyMaterial(_)
            | AuthError::Signing(_)
            | AuthError::Directory(_) => Self::Internal(message),
        }
    }
}

impl From<PlanningError> for ApiError {
    fn from(err: PlanningError) -> Self {
        match err {
            PlanningError::InvalidParameter(msg) => Self::InvalidParameter(msg),
            PlanningError::NotFound(msg) => Self::NotFound(msg),
            PlanningError::EntityValidation(msg) => Self::EntityValidation(msg),
            PlanningError::Auth(auth_err) => Self::from(auth_err),
            PlanningError::Store(store_err) => {
                tracing::error!(error = %store_err, "Store error");
                Self::Internal("storage error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidParameter(rejection.body_text())
    }
}
