//! Request and response types for planning operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use teamtempo_core::{ProjectId, TeamId, UserId};
use teamtempo_store::{ProjectRecord, TeamRecord, UserRecord};

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password; only its hash is stored.
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    /// Account identifier.
    pub uuid: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Whether the account may log in.
    pub enabled: bool,
}

impl From<&UserRecord> for UserView {
    fn from(user: &UserRecord) -> Self {
        Self {
            uuid: user.user_id,
            name: user.full_name.clone(),
            email: user.email.clone(),
            enabled: user.enabled,
        }
    }
}

/// Team fields supplied on create and update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    /// Must be absent on create and equal the path id on update.
    #[serde(default)]
    pub uuid: Option<String>,
    /// Team name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Start date.
    pub start_date: NaiveDate,
    /// Optional end date.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// A team as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    /// Team identifier.
    pub uuid: TeamId,
    /// Team name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Start date.
    pub start_date: NaiveDate,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
}

impl From<&TeamRecord> for TeamView {
    fn from(team: &TeamRecord) -> Self {
        Self {
            uuid: team.team_id,
            name: team.name.clone(),
            description: team.description.clone(),
            start_date: team.start_date,
            end_date: team.end_date,
        }
    }
}

/// Project fields supplied on create and update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    /// Must be absent on create and equal the path id on update.
    #[serde(default)]
    pub uuid: Option<String>,
    /// Project name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Start date.
    pub start_date: NaiveDate,
    /// Optional end date.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Defaults to active on create and to the stored value on update.
    #[serde(default)]
    pub active: Option<bool>,
}

/// A project as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    /// Project identifier.
    pub uuid: ProjectId,
    /// Owning team.
    pub team_uuid: TeamId,
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Start date.
    pub start_date: NaiveDate,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
    /// Whether the project is active.
    pub active: bool,
}

impl From<&ProjectRecord> for ProjectView {
    fn from(project: &ProjectRecord) -> Self {
        Self {
            uuid: project.project_id,
            team_uuid: project.team_id,
            name: project.name.clone(),
            description: project.description.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            active: project.active,
        }
    }
}
