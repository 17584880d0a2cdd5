//! `RocksDB` storage layer for teamtempo.
//!
//! This crate persists user accounts, teams, and projects using `RocksDB`
//! with column families for secondary indexes.
//!
//! # Architecture
//!
//! - `users`: Primary user records, keyed by `user_id`
//! - `users_by_email`: Index from login email to `user_id`
//! - `teams`: Primary team records, keyed by `team_id`
//! - `teams_by_owner`: Index for listing teams by owning user
//! - `projects`: Primary project records, keyed by `project_id`
//! - `projects_by_team`: Index for listing projects by team
//!
//! # Example
//!
//! ```no_run
//! use teamtempo_store::{RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/teamtempo-db").unwrap();
//! let user = store.find_user_by_email("a@b.com").unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;
pub mod types;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;
pub use types::{ProjectRecord, TeamRecord, UserRecord};

use teamtempo_core::{ProjectId, TeamId, UserId};

/// Persistence for accounts, teams, and projects.
///
/// Writes that touch a secondary index update the record and its index
/// entries in one batch.
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Save a user, replacing any record with the same id.
    ///
    /// This also maintains the email index. Callers are responsible for
    /// checking email uniqueness before inserting a new account.
    ///
    /// # Errors
    ///
    /// Fails when `RocksDB` or the CBOR codec fails.
    fn put_user(&self, user: &UserRecord) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Fails when `RocksDB` or the CBOR codec fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>>;

    /// Find a user by exact email.
    ///
    /// # Errors
    ///
    /// Fails when `RocksDB` or the CBOR codec fails.
    fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    // =========================================================================
    // Team Operations
    // =========================================================================

    /// Insert or update a team record.
    ///
    /// # Errors
    ///
    /// Fails when `RocksDB` or the CBOR codec fails.
    fn put_team(&self, team: &TeamRecord) -> Result<()>;

    /// Get a team by ID.
    ///
    /// # Errors
    ///
    /// Fails when `RocksDB` or the CBOR codec fails.
    fn get_team(&self, team_id: &TeamId) -> Result<Option<TeamRecord>>;

    /// Delete a team and every project that belongs to it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the team doesn't exist.
    fn delete_team(&self, team_id: &TeamId) -> Result<()>;

    /// List all teams owned by a user.
    ///
    /// # Errors
    ///
    /// Fails when `RocksDB` or the CBOR codec fails.
    fn list_teams_by_owner(&self, owner_id: &UserId) -> Result<Vec<TeamRecord>>;

    // =========================================================================
    // Project Operations
    // =========================================================================

    /// Insert or update a project record.
    ///
    /// # Errors
    ///
    /// Fails when `RocksDB` or the CBOR codec fails.
    fn put_project(&self, project: &ProjectRecord) -> Result<()>;

    /// Get a project by ID.
    ///
    /// # Errors
    ///
    /// Fails when `RocksDB` or the CBOR codec fails.
    fn get_project(&self, project_id: &ProjectId) -> Result<Option<ProjectRecord>>;

    /// Delete a project by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the project doesn't exist.
    fn delete_project(&self, project_id: &ProjectId) -> Result<()>;

    /// List all projects of a team.
    ///
    /// # Errors
    ///
    /// Fails when `RocksDB` or the CBOR codec fails.
    fn list_projects_by_team(&self, team_id: &TeamId) -> Result<Vec<ProjectRecord>>;
}
