//! HTTP gateway for the teamtempo planning backend.
//!
//! This crate provides the public-facing API. It handles:
//!
//! - bearer token authentication and ordered route authorization
//! - login, signup, and logout
//! - REST endpoints for teams and projects
//! - translating every failure into an `application/problem+json` body
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Clients                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      teamtempo-gateway                      │
//! │  ┌──────────────┐ ┌──────────────┐ ┌─────────────────────┐  │
//! │  │ Authenticate │▶│  Authorize   │▶│  Router + Handlers  │  │
//! │  │    (gate)    │ │ (rule table) │ │                     │  │
//! │  └──────────────┘ └──────────────┘ └─────────────────────┘  │
//! │                  errors ──▶ ApiError (problem+json)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┴──────────────┐
//!               ▼                             ▼
//!        ┌──────────────┐             ┌──────────────┐
//!        │   Planning   │             │     Auth     │
//!        └──────────────┘             └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use teamtempo_auth::{
//!     AuthenticationGate, BcryptPasswordEncoder, CredentialAuthenticator, PasswordEncoder,
//!     RuleTable, SigningKey, TokenCodec,
//! };
//! use teamtempo_gateway::{create_router, GatewayConfig, GatewayState};
//! use teamtempo_planning::{PlanningService, StoreDirectory};
//! use teamtempo_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::from_env()?;
//! let codec = Arc::new(TokenCodec::new(&SigningKey::from_base64(&config.jwt_secret)?));
//!
//! let store = Arc::new(RocksStore::open(&config.data_dir)?);
//! let passwords: Arc<dyn PasswordEncoder> = Arc::new(BcryptPasswordEncoder::new());
//! let directory = Arc::new(StoreDirectory::new(Arc::clone(&store)));
//! let planning = Arc::new(PlanningService::new(store, Arc::clone(&passwords)));
//!
//! let authenticator = Arc::new(CredentialAuthenticator::new(
//!     Arc::clone(&directory),
//!     passwords,
//!     Arc::clone(&codec),
//!     config.token_ttl()?,
//! ));
//! let gate = Arc::new(AuthenticationGate::new(codec, directory));
//!
//! let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
//! let state = GatewayState::new(planning, authenticator, gate, RuleTable::default(), config);
//! axum::serve(listener, create_router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{ConfigError, GatewayConfig};
pub use error::{ApiError, ProblemResponse};
pub use routes::create_router;
pub use state::GatewayState;

// Re-export key types for convenience
pub use auth::{CurrentPrincipal, RequestContext};
