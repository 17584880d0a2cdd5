//! Key encoding utilities for `RocksDB`.
//!
//! Primary keys are the 16 UUID bytes. Index keys concatenate the parent id
//! and the child id so a prefix scan over the parent yields every child.

use teamtempo_core::{ProjectId, TeamId, UserId};

const UUID_LEN: usize = 16;

/// Encode a user key.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Encode an email index key.
///
/// Emails are matched exactly, so the key is the email bytes as given.
#[must_use]
pub fn email_key(email: &str) -> Vec<u8> {
    email.as_bytes().to_vec()
}

/// Decode the user id stored as an email index value.
#[must_use]
pub fn decode_user_id(value: &[u8]) -> Option<UserId> {
    let bytes: [u8; UUID_LEN] = value.try_into().ok()?;
    Some(UserId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Encode a team key.
#[must_use]
pub fn team_key(team_id: &TeamId) -> Vec<u8> {
    team_id.as_bytes().to_vec()
}

/// Encode an owner-team index key: `owner_id || team_id`.
#[must_use]
pub fn owner_team_key(owner_id: &UserId, team_id: &TeamId) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 * UUID_LEN);
    key.extend_from_slice(owner_id.as_bytes());
    key.extend_from_slice(team_id.as_bytes());
    key
}

/// Encode an owner prefix for scanning all teams of a user.
#[must_use]
pub fn owner_prefix(owner_id: &UserId) -> Vec<u8> {
    owner_id.as_bytes().to_vec()
}

/// Extract the team id from an owner-team key.
#[must_use]
pub fn extract_team_id(key: &[u8]) -> Option<TeamId> {
    let bytes: [u8; UUID_LEN] = key.get(UUID_LEN..2 * UUID_LEN)?.try_into().ok()?;
    Some(TeamId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Encode a project key.
#[must_use]
pub fn project_key(project_id: &ProjectId) -> Vec<u8> {
    project_id.as_bytes().to_vec()
}

/// Encode a team-project index key: `team_id || project_id`.
#[must_use]
pub fn team_project_key(team_id: &TeamId, project_id: &ProjectId) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 * UUID_LEN);
    key.extend_from_slice(team_id.as_bytes());
    key.extend_from_slice(project_id.as_bytes());
    key
}

/// Encode a team prefix for scanning all projects of a team.
#[must_use]
pub fn team_prefix(team_id: &TeamId) -> Vec<u8> {
    team_id.as_bytes().to_vec()
}

/// Extract the project id from a team-project key.
#[must_use]
pub fn extract_project_id(key: &[u8]) -> Option<ProjectId> {
    let bytes: [u8; UUID_LEN] = key.get(UUID_LEN..2 * UUID_LEN)?.try_into().ok()?;
    Some(ProjectId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}
