//! Records persisted by the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use teamtempo_core::{ProjectId, SecurityRole, TeamId, UserId};

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier.
    pub user_id: UserId,
    /// Display name.
    pub full_name: String,
    /// Login identifier. Unique across accounts.
    pub email: String,
    /// One-way password hash.
    pub password_hash: String,
    /// Disabled accounts cannot log in.
    pub enabled: bool,
    /// Authorization role.
    pub role: SecurityRole,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A team owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Unique identifier.
    pub team_id: TeamId,
    /// Owning user.
    pub owner_id: UserId,
    /// Team name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// First day of the team's planning horizon.
    pub start_date: NaiveDate,
    /// Last day, if the team is time-boxed.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A project belonging to a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Unique identifier.
    pub project_id: ProjectId,
    /// Parent team.
    pub team_id: TeamId,
    /// Project name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date, if known.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Inactive projects are kept for history.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
