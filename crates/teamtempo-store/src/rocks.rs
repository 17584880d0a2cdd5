//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};
use teamtempo_core::{ProjectId, TeamId, UserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::types::{ProjectRecord, TeamRecord, UserRecord};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::MissingColumnFamily(name.to_owned()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf).map_err(|e| StoreError::Codec(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Codec(e.to_string()))
    }

    /// Read and decode a record from a primary column family.
    fn get_record<T: serde::de::DeserializeOwned>(&self, name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(name)?;
        self.db
            .get_cf(&cf, key)?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Collect every index key in `name` starting with `prefix`.
    fn scan_prefix(&self, name: &str, prefix: &[u8]) -> Result<Vec<Box<[u8]>>> {
        let cf = self.cf(name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut out = Vec::new();
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            out.push(key);
        }
        Ok(out)
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        Ok(self.db.write(batch)?)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn put_user(&self, user: &UserRecord) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_by_email = self.cf(cf::USERS_BY_EMAIL)?;

        let user_key = keys::user_key(&user.user_id);
        let value = Self::serialize(user)?;

        let old_email = self
            .get_record::<UserRecord>(cf::USERS, &user_key)?
            .map(|u| u.email);

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, &user_key, &value);
        if let Some(old) = old_email {
            if old != user.email {
                batch.delete_cf(&cf_by_email, keys::email_key(&old));
            }
        }
        batch.put_cf(&cf_by_email, keys::email_key(&user.email), &user_key);

        self.write(batch)
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>> {
        self.get_record(cf::USERS, &keys::user_key(user_id))
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let cf_by_email = self.cf(cf::USERS_BY_EMAIL)?;
        let Some(value) = self
            .db
            .get_cf(&cf_by_email, keys::email_key(email))?
        else {
            return Ok(None);
        };

        let user_id =
            keys::decode_user_id(&value).ok_or(StoreError::CorruptKey(cf::USERS_BY_EMAIL))?;
        self.get_user(&user_id)
    }

    // =========================================================================
    // Team Operations
    // =========================================================================

    fn put_team(&self, team: &TeamRecord) -> Result<()> {
        let cf_teams = self.cf(cf::TEAMS)?;
        let cf_by_owner = self.cf(cf::TEAMS_BY_OWNER)?;

        let team_key = keys::team_key(&team.team_id);
        let value = Self::serialize(team)?;

        let old_owner = self
            .get_record::<TeamRecord>(cf::TEAMS, &team_key)?
            .map(|t| t.owner_id);

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_teams, &team_key, &value);
        if let Some(old) = old_owner {
            if old != team.owner_id {
                batch.delete_cf(&cf_by_owner, keys::owner_team_key(&old, &team.team_id));
            }
        }
        batch.put_cf(&cf_by_owner, keys::owner_team_key(&team.owner_id, &team.team_id), []);

        self.write(batch)
    }

    fn get_team(&self, team_id: &TeamId) -> Result<Option<TeamRecord>> {
        self.get_record(cf::TEAMS, &keys::team_key(team_id))
    }

    fn delete_team(&self, team_id: &TeamId) -> Result<()> {
        let cf_teams = self.cf(cf::TEAMS)?;
        let cf_by_owner = self.cf(cf::TEAMS_BY_OWNER)?;
        let cf_projects = self.cf(cf::PROJECTS)?;
        let cf_by_team = self.cf(cf::PROJECTS_BY_TEAM)?;

        let team = self.get_team(team_id)?.ok_or(StoreError::NotFound)?;
        let project_keys = self.scan_prefix(cf::PROJECTS_BY_TEAM, &keys::team_prefix(team_id))?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_teams, keys::team_key(team_id));
        batch.delete_cf(&cf_by_owner, keys::owner_team_key(&team.owner_id, team_id));
        for index_key in &project_keys {
            let project_id = keys::extract_project_id(index_key)
                .ok_or(StoreError::CorruptKey(cf::PROJECTS_BY_TEAM))?;
            batch.delete_cf(&cf_projects, keys::project_key(&project_id));
            batch.delete_cf(&cf_by_team, index_key);
        }

        tracing::debug!(
            team_id = %team_id,
            projects = project_keys.len(),
            "Deleting team with its projects"
        );
        self.write(batch)
    }

    fn list_teams_by_owner(&self, owner_id: &UserId) -> Result<Vec<TeamRecord>> {
        let mut teams = Vec::new();
        for key in self.scan_prefix(cf::TEAMS_BY_OWNER, &keys::owner_prefix(owner_id))? {
            let team_id =
                keys::extract_team_id(&key).ok_or(StoreError::CorruptKey(cf::TEAMS_BY_OWNER))?;
            if let Some(team) = self.get_team(&team_id)? {
                teams.push(team);
            }
        }
        Ok(teams)
    }

    // =========================================================================
    // Project Operations
    // =========================================================================

    fn put_project(&self, project: &ProjectRecord) -> Result<()> {
        let cf_projects = self.cf(cf::PROJECTS)?;
        let cf_by_team = self.cf(cf::PROJECTS_BY_TEAM)?;

        let project_key = keys::project_key(&project.project_id);
        let value = Self::serialize(project)?;

        let old_team = self
            .get_record::<ProjectRecord>(cf::PROJECTS, &project_key)?
            .map(|p| p.team_id);

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_projects, &project_key, &value);
        if let Some(old) = old_team {
            if old != project.team_id {
                batch.delete_cf(&cf_by_team, keys::team_project_key(&old, &project.project_id));
            }
        }
        batch.put_cf(
            &cf_by_team,
            keys::team_project_key(&project.team_id, &project.project_id),
            [],
        );

        self.write(batch)
    }

    fn get_project(&self, project_id: &ProjectId) -> Result<Option<ProjectRecord>> {
        self.get_record(cf::PROJECTS, &keys::project_key(project_id))
    }

    fn delete_project(&self, project_id: &ProjectId) -> Result<()> {
        let cf_projects = self.cf(cf::PROJECTS)?;
        let cf_by_team = self.cf(cf::PROJECTS_BY_TEAM)?;

        let project = self.get_project(project_id)?.ok_or(StoreError::NotFound)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_projects, keys::project_key(project_id));
        batch.delete_cf(&cf_by_team, keys::team_project_key(&project.team_id, project_id));

        self.write(batch)
    }

    fn list_projects_by_team(&self, team_id: &TeamId) -> Result<Vec<ProjectRecord>> {
        let mut projects = Vec::new();
        for key in self.scan_prefix(cf::PROJECTS_BY_TEAM, &keys::team_prefix(team_id))? {
            let project_id = keys::extract_project_id(&key)
                .ok_or(StoreError::CorruptKey(cf::PROJECTS_BY_TEAM))?;
            if let Some(project) = self.get_project(&project_id)? {
                projects.push(project);
            }
        }
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use teamtempo_core::SecurityRole;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn create_test_user(email: &str) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            user_id: UserId::generate(),
            full_name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            enabled: true,
            role: SecurityRole::User,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_test_team(owner_id: UserId, name: &str) -> TeamRecord {
        let now = Utc::now();
        TeamRecord {
            team_id: TeamId::generate(),
            owner_id,
            name: name.to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_test_project(team_id: TeamId, name: &str) -> ProjectRecord {
        let now = Utc::now();
        ProjectRecord {
            project_id: ProjectId::generate(),
            team_id,
            name: name.to_string(),
            description: Some("desc".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn user_crud_and_email_lookup() {
        let (store, _dir) = create_test_store();
        let user = create_test_user("a@b.com");

        store.put_user(&user).unwrap();

        assert_eq!(store.get_user(&user.user_id).unwrap(), Some(user.clone()));
        assert_eq!(store.find_user_by_email("a@b.com").unwrap(), Some(user));
        assert!(store.find_user_by_email("A@B.COM").unwrap().is_none());
    }

    #[test]
    fn email_index_follows_email_change() {
        let (store, _dir) = create_test_store();
        let mut user = create_test_user("old@b.com");
        store.put_user(&user).unwrap();

        user.email = "new@b.com".to_string();
        store.put_user(&user).unwrap();

        assert!(store.find_user_by_email("old@b.com").unwrap().is_none());
        assert_eq!(
            store.find_user_by_email("new@b.com").unwrap().map(|u| u.user_id),
            Some(user.user_id)
        );
    }

    #[test]
    fn teams_are_listed_per_owner() {
        let (store, _dir) = create_test_store();
        let alice = UserId::generate();
        let bob = UserId::generate();

        store.put_team(&create_test_team(alice, "a1")).unwrap();
        store.put_team(&create_test_team(alice, "a2")).unwrap();
        store.put_team(&create_test_team(bob, "b1")).unwrap();

        assert_eq!(store.list_teams_by_owner(&alice).unwrap().len(), 2);
        let bobs = store.list_teams_by_owner(&bob).unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].name, "b1");
    }

    #[test]
    fn delete_team_cascades_projects() {
        let (store, _dir) = create_test_store();
        let owner = UserId::generate();
        let team = create_test_team(owner, "team");
        let other = create_test_team(owner, "other");
        store.put_team(&team).unwrap();
        store.put_team(&other).unwrap();

        let p1 = create_test_project(team.team_id, "p1");
        let p2 = create_test_project(team.team_id, "p2");
        let kept = create_test_project(other.team_id, "kept");
        for p in [&p1, &p2, &kept] {
            store.put_project(p).unwrap();
        }

        store.delete_team(&team.team_id).unwrap();

        assert!(store.get_team(&team.team_id).unwrap().is_none());
        assert!(store.get_project(&p1.project_id).unwrap().is_none());
        assert!(store.get_project(&p2.project_id).unwrap().is_none());
        assert!(store.list_projects_by_team(&team.team_id).unwrap().is_empty());
        assert_eq!(store.list_teams_by_owner(&owner).unwrap().len(), 1);
        assert_eq!(store.list_projects_by_team(&other.team_id).unwrap(), vec![kept]);
    }

    #[test]
    fn delete_missing_records() {
        let (store, _dir) = create_test_store();
        assert!(matches!(
            store.delete_team(&TeamId::generate()),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_project(&ProjectId::generate()),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn project_update_and_delete() {
        let (store, _dir) = create_test_store();
        let team = create_test_team(UserId::generate(), "team");
        store.put_team(&team).unwrap();

        let mut project = create_test_project(team.team_id, "p");
        store.put_project(&project).unwrap();

        project.active = false;
        project.name = "renamed".to_string();
        store.put_project(&project).unwrap();

        let listed = store.list_projects_by_team(&team.team_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "renamed");
        assert!(!listed[0].active);

        store.delete_project(&project.project_id).unwrap();
        assert!(store.list_projects_by_team(&team.team_id).unwrap().is_empty());
    }
}
