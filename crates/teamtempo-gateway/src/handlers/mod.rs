//! HTTP request handlers.
//!
//! This module contains all the endpoint handlers for the gateway API.

pub mod auth;
pub mod health;
pub mod projects;
pub mod teams;

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON request body whose rejections become problem responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Fallback for unrouted paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("No handler found for this path".to_string())
}
