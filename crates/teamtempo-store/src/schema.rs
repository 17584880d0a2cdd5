//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary user records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Index: user id by email, keyed by the raw email bytes.
    pub const USERS_BY_EMAIL: &str = "users_by_email";

    /// Primary team records, keyed by `team_id`.
    pub const TEAMS: &str = "teams";

    /// Index: teams by owner, keyed by `owner_id || team_id`.
    pub const TEAMS_BY_OWNER: &str = "teams_by_owner";

    /// Primary project records, keyed by `project_id`.
    pub const PROJECTS: &str = "projects";

    /// Index: projects by team, keyed by `team_id || project_id`.
    pub const PROJECTS_BY_TEAM: &str = "projects_by_team";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERS_BY_EMAIL,
        cf::TEAMS,
        cf::TEAMS_BY_OWNER,
        cf::PROJECTS,
        cf::PROJECTS_BY_TEAM,
    ]
}
