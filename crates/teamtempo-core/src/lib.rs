//! Core types shared across the teamtempo planning backend.
//!
//! - **Identifiers**: UUID newtypes for users, teams, and projects
//! - **Principals**: the authenticated identity and its [`SecurityRole`]
//! - **Parse errors**: [`IdError`] for malformed identifiers
//!
//! # Example
//!
//! ```
//! use teamtempo_core::{IdError, TeamId};
//!
//! let id: TeamId = "6f1c2f5e-4b8e-4a55-9c1e-2f0d9e7c1a11".parse().unwrap();
//! assert_eq!(id.to_string(), "6f1c2f5e-4b8e-4a55-9c1e-2f0d9e7c1a11");
//!
//! assert_eq!("".parse::<TeamId>(), Err(IdError::Empty));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod principal;

pub use ids::{IdError, ProjectId, TeamId, UserId};
pub use principal::{Principal, SecurityRole};
