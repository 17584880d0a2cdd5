//! Accounts, teams, and projects for teamtempo.
//!
//! This crate holds the business logic behind the HTTP surface. It sits
//! between the gateway and the storage layer and supplies the account
//! directory the auth layer resolves tokens against.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                Gateway (HTTP)                 │
//! └───────────────────────────────────────────────┘
//!          │                          │
//!          ▼                          ▼
//! ┌──────────────────┐     ┌──────────────────────┐
//! │  PlanningService │     │    StoreDirectory    │
//! │ signup / teams / │     │ (PrincipalDirectory) │
//! │     projects     │     └──────────────────────┘
//! └──────────────────┘                │
//!          │                          │
//!          └────────────┬─────────────┘
//!                       ▼
//!                ┌─────────────┐
//!                │    Store    │
//!                │  (RocksDB)  │
//!                └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use teamtempo_auth::BcryptPasswordEncoder;
//! use teamtempo_planning::{Planning, PlanningService, SignupRequest};
//! use teamtempo_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/tmp/teamtempo")?);
//! let planning = PlanningService::new(store, Arc::new(BcryptPasswordEncoder::new()));
//!
//! let user = planning
//!     .sign_up(SignupRequest {
//!         name: "Ada".into(),
//!         email: "ada@example.com".into(),
//!         password: "password1".into(),
//!     })
//!     .await?;
//! println!("Registered {}", user.uuid);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod directory;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

pub use directory::StoreDirectory;
pub use error::{PlanningError, Result};
pub use service::{Planning, PlanningService};
pub use types::{ProjectInput, ProjectView, SignupRequest, TeamInput, TeamView, UserView};
