//! Token authentication and route authorization for teamtempo.
//!
//! This crate turns credentials into signed access tokens and decides, per
//! request, who the caller is and whether they may reach a route:
//!
//! - [`SigningKey`]: HMAC key decoded once from a base64 secret
//! - [`TokenCodec`]: issues and verifies HMAC-signed JWTs
//! - [`CredentialAuthenticator`]: email/password login and logout
//! - [`AuthenticationGate`]: bearer token to [`SecurityContext`]
//! - [`RuleTable`]: ordered, first-match-wins authorization rules
//!
//! # Architecture
//!
//! ```text
//! POST /auth/login ──▶ CredentialAuthenticator ──▶ TokenCodec::issue
//!                              │
//!                              ▼
//!                     PrincipalDirectory + PasswordEncoder
//!
//! any request ──▶ AuthenticationGate ──▶ SecurityContext ──▶ RuleTable
//!                     │                                         │
//!                     ▼                                         ▼
//!              TokenCodec::decode                    Granted / 401 / 403
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::TimeDelta;
//! use teamtempo_auth::{SigningKey, TokenCodec};
//!
//! let key = SigningKey::from_bytes(vec![42u8; 32]).unwrap();
//! let codec = TokenCodec::new(&key);
//!
//! let token = codec.issue("a@b.com", TimeDelta::minutes(15)).unwrap();
//! assert_eq!(codec.extract_subject(&token).unwrap(), "a@b.com");
//! assert!(!codec.is_expired(&token));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod authenticator;
pub mod context;
pub mod directory;
pub mod error;
pub mod gate;
pub mod key;
pub mod password;
pub mod rules;
pub mod token;

pub use authenticator::{CredentialAuthenticator, LoginOutcome, LogoutAck};
pub use context::SecurityContext;
pub use directory::{Account, PrincipalDirectory};
pub use error::{AuthError, Result};
pub use gate::{AuthenticationGate, GateOutcome, BEARER_PREFIX};
pub use key::SigningKey;
pub use password::{hash_blocking, verify_blocking, BcryptPasswordEncoder, PasswordEncoder};
pub use rules::{AccessDecision, AuthorizationRule, PathPattern, RuleTable};
pub use token::{Claims, TokenCodec};

#[cfg(any(test, feature = "test-utils"))]
pub use directory::InMemoryDirectory;
