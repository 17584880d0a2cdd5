//! Planning service implementation.
//!
//! This module provides the `Planning` trait and the `PlanningService`
//! implementation backed by a [`Store`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use teamtempo_auth::{hash_blocking, PasswordEncoder};
use teamtempo_core::{ProjectId, SecurityRole, TeamId, UserId};
use teamtempo_store::{ProjectRecord, Store, TeamRecord, UserRecord};

use crate::error::{PlanningError, Result};
use crate::types::{ProjectInput, ProjectView, SignupRequest, TeamInput, TeamView, UserView};
use crate::validation;

/// Trait defining the planning operations.
///
/// Every team operation is scoped to its owner: a team owned by another user
/// is reported as not found.
#[async_trait]
pub trait Planning: Send + Sync {
    // =========================================================================
    // Accounts
    // =========================================================================

    /// Register a new enabled account with the `USER` role.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::EntityValidation` if a field is invalid or the
    /// email is already registered.
    async fn sign_up(&self, request: SignupRequest) -> Result<UserView>;

    // =========================================================================
    // Teams
    // =========================================================================

    /// List the caller's teams.
    async fn my_teams(&self, owner: &UserId) -> Result<Vec<TeamView>>;

    /// Create a team owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::InvalidParameter` if the input carries a uuid.
    async fn create_team(&self, owner: &UserId, input: TeamInput) -> Result<TeamView>;

    /// Replace a team's fields.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::InvalidParameter` for a malformed or
    /// mismatched uuid, or `PlanningError::NotFound`.
    async fn update_team(&self, owner: &UserId, team_uuid: &str, input: TeamInput)
        -> Result<TeamView>;

    /// Delete a team and its projects.
    async fn delete_team(&self, owner: &UserId, team_uuid: &str) -> Result<()>;

    /// Delete several teams. Nothing is deleted unless every team is found.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::InvalidParameter` if the list is empty.
    async fn delete_teams(&self, owner: &UserId, team_uuids: &[String]) -> Result<()>;

    // =========================================================================
    // Projects
    // =========================================================================

    /// List the projects of one of the caller's teams.
    async fn team_projects(&self, owner: &UserId, team_uuid: &str) -> Result<Vec<ProjectView>>;

    /// Create a project in one of the caller's teams.
    async fn create_project(
        &self,
        owner: &UserId,
        team_uuid: &str,
        input: ProjectInput,
    ) -> Result<ProjectView>;

    /// Replace a project's fields.
    async fn update_project(
        &self,
        owner: &UserId,
        project_uuid: &str,
        input: ProjectInput,
    ) -> Result<ProjectView>;

    /// Delete a project.
    async fn delete_project(&self, owner: &UserId, project_uuid: &str) -> Result<()>;
}

/// The main planning service implementation.
///
/// Every check-then-write sequence runs under `writes`: an email is
/// registered at most once and no project outlives its team.
pub struct PlanningService<S: Store> {
    store: Arc<S>,
    passwords: Arc<dyn PasswordEncoder>,
    writes: Mutex<()>,
}

impl<S: Store> PlanningService<S> {
    /// Create a new planning service.
    #[must_use]
    pub fn new(store: Arc<S>, passwords: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            store,
            passwords,
            writes: Mutex::new(()),
        }
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a team and verify the caller owns it.
    fn owned_team(&self, owner: &UserId, team_uuid: &str) -> Result<TeamRecord> {
        let team_id: TeamId = team_uuid.parse()?;
        self.store
            .get_team(&team_id)?
            .filter(|team| team.owner_id == *owner)
            .ok_or_else(|| PlanningError::NotFound(format!("Team not found with uuid: {team_id}")))
    }

    /// Get a project and verify the caller owns its team.
    fn owned_project(&self, owner: &UserId, project_uuid: &str) -> Result<ProjectRecord> {
        let project_id: ProjectId = project_uuid.parse()?;
        let not_found =
            || PlanningError::NotFound(format!("Project not found with uuid: {project_id}"));

        let project = self.store.get_project(&project_id)?.ok_or_else(not_found)?;
        match self.store.get_team(&project.team_id)? {
            Some(team) if team.owner_id == *owner => Ok(project),
            _ => Err(not_found()),
        }
    }
}

/// Reject a body uuid that does not name the path resource.
fn check_body_uuid<T>(body: Option<&str>, expected: &T) -> Result<()>
where
    T: FromStr + PartialEq + fmt::Display,
{
    match body {
        Some(raw) if raw.parse::<T>().ok().as_ref() != Some(expected) => {
            Err(PlanningError::InvalidParameter(format!(
                "UUID {raw} in body does not match UUID {expected} in path"
            )))
        }
        _ => Ok(()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl<S: Store + 'static> Planning for PlanningService<S> {
    // =========================================================================
    // Accounts
    // =========================================================================

    async fn sign_up(&self, request: SignupRequest) -> Result<UserView> {
        validation::validate_signup(&request)?;
        let duplicate = |email: &str| {
            PlanningError::EntityValidation(format!("Email {email} is already registered"))
        };

        if self.store.find_user_by_email(&request.email)?.is_some() {
            return Err(duplicate(&request.email));
        }

        let password_hash = hash_blocking(Arc::clone(&self.passwords), request.password).await?;

        let now = Utc::now();
        let user = UserRecord {
            user_id: UserId::generate(),
            full_name: request.name.trim().to_string(),
            email: request.email,
            password_hash,
            enabled: true,
            role: SecurityRole::User,
            created_at: now,
            updated_at: now,
        };

        {
            let _guard = self.writes.lock();
            // Checked again: another signup may have won while we hashed.
            if self.store.find_user_by_email(&user.email)?.is_some() {
                return Err(duplicate(&user.email));
            }
            self.store.put_user(&user)?;
        }

        tracing::info!(user_id = %user.user_id, email = %user.email, "Registered user");

        Ok(UserView::from(&user))
    }

    // =========================================================================
    // Teams
    // =========================================================================

    async fn my_teams(&self, owner: &UserId) -> Result<Vec<TeamView>> {
        let teams = self.store.list_teams_by_owner(owner)?;
        Ok(teams.iter().map(TeamView::from).collect())
    }

    async fn create_team(&self, owner: &UserId, input: TeamInput) -> Result<TeamView> {
        if input.uuid.is_some() {
            return Err(PlanningError::InvalidParameter(
                "New Team should not contain UUID".to_string(),
            ));
        }
        validation::validate_team(&input)?;

        let now = Utc::now();
        let team = TeamRecord {
            team_id: TeamId::generate(),
            owner_id: *owner,
            name: input.name.trim().to_string(),
            description: non_blank(input.description),
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        };
        self.store.put_team(&team)?;

        tracing::info!(team_id = %team.team_id, owner = %owner, name = %team.name, "Created team");

        Ok(TeamView::from(&team))
    }

    async fn update_team(
        &self,
        owner: &UserId,
        team_uuid: &str,
        input: TeamInput,
    ) -> Result<TeamView> {
        let _guard = self.writes.lock();
        let mut team = self.owned_team(owner, team_uuid)?;
        check_body_uuid(input.uuid.as_deref(), &team.team_id)?;
        validation::validate_team(&input)?;

        team.name = input.name.trim().to_string();
        team.description = non_blank(input.description);
        team.start_date = input.start_date;
        team.end_date = input.end_date;
        team.updated_at = Utc::now();
        self.store.put_team(&team)?;

        tracing::info!(team_id = %team.team_id, "Updated team");

        Ok(TeamView::from(&team))
    }

    async fn delete_team(&self, owner: &UserId, team_uuid: &str) -> Result<()> {
        let _guard = self.writes.lock();
        let team = self.owned_team(owner, team_uuid)?;
        self.store.delete_team(&team.team_id)?;

        tracing::info!(team_id = %team.team_id, owner = %owner, "Deleted team");
        Ok(())
    }

    async fn delete_teams(&self, owner: &UserId, team_uuids: &[String]) -> Result<()> {
        if team_uuids.is_empty() {
            return Err(PlanningError::InvalidParameter(
                "Team UUID list can not be empty".to_string(),
            ));
        }

        let _guard = self.writes.lock();
        let teams = team_uuids
            .iter()
            .map(|uuid| self.owned_team(owner, uuid))
            .collect::<Result<Vec<_>>>()?;

        for team in &teams {
            self.store.delete_team(&team.team_id)?;
        }

        tracing::info!(owner = %owner, count = teams.len(), "Deleted selected teams");
        Ok(())
    }

    // =========================================================================
    // Projects
    // =========================================================================

    async fn team_projects(&self, owner: &UserId, team_uuid: &str) -> Result<Vec<ProjectView>> {
        let team = self.owned_team(owner, team_uuid)?;
        let projects = self.store.list_projects_by_team(&team.team_id)?;
        Ok(projects.iter().map(ProjectView::from).collect())
    }

    async fn create_project(
        &self,
        owner: &UserId,
        team_uuid: &str,
        input: ProjectInput,
    ) -> Result<ProjectView> {
        let _guard = self.writes.lock();
        let team = self.owned_team(owner, team_uuid)?;
        if input.uuid.is_some() {
            return Err(PlanningError::InvalidParameter(
                "New Project should not contain UUID".to_string(),
            ));
        }
        validation::validate_project(&input)?;

        let now = Utc::now();
        let project = ProjectRecord {
            project_id: ProjectId::generate(),
            team_id: team.team_id,
            name: input.name.trim().to_string(),
            description: non_blank(input.description),
            start_date: input.start_date,
            end_date: input.end_date,
            active: input.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.put_project(&project)?;

        tracing::info!(
            project_id = %project.project_id,
            team_id = %team.team_id,
            "Created project"
        );

        Ok(ProjectView::from(&project))
    }

    async fn update_project(
        &self,
        owner: &UserId,
        project_uuid: &str,
        input: ProjectInput,
    ) -> Result<ProjectView> {
        let _guard = self.writes.lock();
        let mut project = self.owned_project(owner, project_uuid)?;
        check_body_uuid(input.uuid.as_deref(), &project.project_id)?;
        validation::validate_project(&input)?;

        project.name = input.name.trim().to_string();
        project.description = non_blank(input.description);
        project.start_date = input.start_date;
        project.end_date = input.end_date;
        if let Some(active) = input.active {
            project.active = active;
        }
        project.updated_at = Utc::now();
        self.store.put_project(&project)?;

        tracing::info!(project_id = %project.project_id, "Updated project");

        Ok(ProjectView::from(&project))
    }

    async fn delete_project(&self, owner: &UserId, project_uuid: &str) -> Result<()> {
        let _guard = self.writes.lock();
        let project = self.owned_project(owner, project_uuid)?;
        self.store.delete_project(&project.project_id)?;

        tracing::info!(project_id = %project.project_id, "Deleted project");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use teamtempo_auth::BcryptPasswordEncoder;
    use teamtempo_store::RocksStore;
    use tempfile::TempDir;

    fn setup() -> (PlanningService<RocksStore>, TempDir, UserId) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let service = PlanningService::new(store, Arc::new(BcryptPasswordEncoder::with_cost(4)));
        (service, dir, UserId::generate())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn team_input(name: &str) -> TeamInput {
        TeamInput {
            uuid: None,
            name: name.to_string(),
            description: Some("the team".to_string()),
            start_date: date(2024, 1, 1),
            end_date: None,
        }
    }

    fn project_input(name: &str) -> ProjectInput {
        ProjectInput {
            uuid: None,
            name: name.to_string(),
            description: None,
            start_date: date(2024, 2, 1),
            end_date: Some(date(2024, 6, 30)),
            active: None,
        }
    }

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            password: "password1".to_string(),
        }
    }

    #[tokio::test]
    async fn sign_up_stores_hashed_enabled_user() {
        let (service, _dir, _) = setup();
        let view = service.sign_up(signup("ada@example.com")).await.unwrap();

        assert_eq!(view.email, "ada@example.com");
        assert!(view.enabled);

        let stored = service.store().find_user_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(stored.user_id, view.uuid);
        assert_eq!(stored.role, SecurityRole::User);
        assert_ne!(stored.password_hash, "password1");
        assert!(BcryptPasswordEncoder::with_cost(4).verify_password("password1", &stored.password_hash));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (service, _dir, _) = setup();
        service.sign_up(signup("ada@example.com")).await.unwrap();
        let err = service.sign_up(signup("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, PlanningError::EntityValidation(_)));
    }

    #[tokio::test]
    async fn invalid_signup_is_rejected() {
        let (service, _dir, _) = setup();
        let mut request = signup("ada@example.com");
        request.password = "short".to_string();
        let err = service.sign_up(request).await.unwrap_err();
        assert_eq!(err.http_status_code(), 422);
        assert!(service.store().find_user_by_email("ada@example.com").unwrap().is_none());
    }

    #[tokio::test]
    async fn create_and_list_teams() {
        let (service, _dir, owner) = setup();
        let created = service.create_team(&owner, team_input("Core")).await.unwrap();

        let teams = service.my_teams(&owner).await.unwrap();
        assert_eq!(teams, vec![created]);
        assert!(service.my_teams(&UserId::generate()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_team_with_uuid_is_rejected() {
        let (service, _dir, owner) = setup();
        let mut input = team_input("Core");
        input.uuid = Some(TeamId::generate().to_string());

        let err = service.create_team(&owner, input).await.unwrap_err();
        assert!(matches!(err, PlanningError::InvalidParameter(ref m) if m == "New Team should not contain UUID"));
    }

    #[tokio::test]
    async fn update_team_validates_uuid() {
        let (service, _dir, owner) = setup();
        let team = service.create_team(&owner, team_input("Core")).await.unwrap();

        let err = service.update_team(&owner, "", team_input("x")).await.unwrap_err();
        assert!(matches!(err, PlanningError::InvalidParameter(ref m) if m == "UUID can not be empty or null"));

        let err = service
            .update_team(&owner, "abc", team_input("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlanningError::InvalidParameter(ref m) if m == "UUID abc is invalid"));

        let mut mismatched = team_input("x");
        mismatched.uuid = Some(TeamId::generate().to_string());
        let err = service
            .update_team(&owner, &team.uuid.to_string(), mismatched)
            .await
            .unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[tokio::test]
    async fn update_team_replaces_fields() {
        let (service, _dir, owner) = setup();
        let team = service.create_team(&owner, team_input("Core")).await.unwrap();

        let mut input = team_input("Platform");
        input.uuid = Some(team.uuid.to_string());
        input.description = Some("   ".to_string());
        input.end_date = Some(date(2024, 12, 31));

        let updated = service
            .update_team(&owner, &team.uuid.to_string(), input)
            .await
            .unwrap();
        assert_eq!(updated.uuid, team.uuid);
        assert_eq!(updated.name, "Platform");
        assert_eq!(updated.description, None);
        assert_eq!(updated.end_date, Some(date(2024, 12, 31)));
    }

    #[tokio::test]
    async fn other_users_team_is_not_found() {
        let (service, _dir, owner) = setup();
        let team = service.create_team(&owner, team_input("Core")).await.unwrap();
        let intruder = UserId::generate();

        let err = service
            .delete_team(&intruder, &team.uuid.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanningError::NotFound(ref m) if m == &format!("Team not found with uuid: {}", team.uuid)));
        assert_eq!(service.my_teams(&owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_selected_teams() {
        let (service, _dir, owner) = setup();
        let a = service.create_team(&owner, team_input("A")).await.unwrap();
        let b = service.create_team(&owner, team_input("B")).await.unwrap();
        let c = service.create_team(&owner, team_input("C")).await.unwrap();

        service
            .delete_teams(&owner, &[a.uuid.to_string(), b.uuid.to_string()])
            .await
            .unwrap();

        assert_eq!(service.my_teams(&owner).await.unwrap(), vec![c]);
    }

    #[tokio::test]
    async fn delete_selected_teams_is_all_or_nothing() {
        let (service, _dir, owner) = setup();
        let a = service.create_team(&owner, team_input("A")).await.unwrap();

        let err = service
            .delete_teams(&owner, &[a.uuid.to_string(), TeamId::generate().to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, PlanningError::NotFound(_)));
        assert_eq!(service.my_teams(&owner).await.unwrap().len(), 1);

        let err = service.delete_teams(&owner, &[]).await.unwrap_err();
        assert!(matches!(err, PlanningError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn project_lifecycle() {
        let (service, _dir, owner) = setup();
        let team = service.create_team(&owner, team_input("Core")).await.unwrap();
        let team_uuid = team.uuid.to_string();

        let project = service
            .create_project(&owner, &team_uuid, project_input("Launch"))
            .await
            .unwrap();
        assert!(project.active);
        assert_eq!(project.team_uuid, team.uuid);

        let mut input = project_input("Launch v2");
        input.active = Some(false);
        let updated = service
            .update_project(&owner, &project.uuid.to_string(), input)
            .await
            .unwrap();
        assert_eq!(updated.name, "Launch v2");
        assert!(!updated.active);

        assert_eq!(
            service.team_projects(&owner, &team_uuid).await.unwrap(),
            vec![updated]
        );

        service
            .delete_project(&owner, &project.uuid.to_string())
            .await
            .unwrap();
        assert!(service.team_projects(&owner, &team_uuid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn projects_follow_team_ownership() {
        let (service, _dir, owner) = setup();
        let team = service.create_team(&owner, team_input("Core")).await.unwrap();
        let project = service
            .create_project(&owner, &team.uuid.to_string(), project_input("Launch"))
            .await
            .unwrap();
        let intruder = UserId::generate();

        let err = service
            .update_project(&intruder, &project.uuid.to_string(), project_input("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlanningError::NotFound(_)));

        let err = service
            .create_project(&intruder, &team.uuid.to_string(), project_input("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlanningError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_team_removes_projects() {
        let (service, _dir, owner) = setup();
        let team = service.create_team(&owner, team_input("Core")).await.unwrap();
        let project = service
            .create_project(&owner, &team.uuid.to_string(), project_input("Launch"))
            .await
            .unwrap();

        service.delete_team(&owner, &team.uuid.to_string()).await.unwrap();

        let err = service
            .delete_project(&owner, &project.uuid.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanningError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_signups_register_an_email_once() {
        let (service, _dir, _) = setup();
        let service = Arc::new(service);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.sign_up(signup("dup@example.com")).await })
            })
            .collect();

        let mut registered = Vec::new();
        for task in tasks {
            match task.await.unwrap() {
                Ok(view) => registered.push(view.uuid),
                Err(err) => assert!(matches!(err, PlanningError::EntityValidation(_))),
            }
        }

        assert_eq!(registered.len(), 1);
        let stored = service.store().find_user_by_email("dup@example.com").unwrap().unwrap();
        assert_eq!(stored.user_id, registered[0]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn projects_created_during_team_delete_are_not_orphaned() {
        let (service, _dir, owner) = setup();
        let service = Arc::new(service);
        let team = service.create_team(&owner, team_input("Core")).await.unwrap();
        let team_uuid = team.uuid.to_string();

        let creates: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                let team_uuid = team_uuid.clone();
                tokio::spawn(async move {
                    service
                        .create_project(&owner, &team_uuid, project_input(&format!("P{i}")))
                        .await
                })
            })
            .collect();
        let delete = {
            let service = Arc::clone(&service);
            let team_uuid = team_uuid.clone();
            tokio::spawn(async move { service.delete_team(&owner, &team_uuid).await })
        };

        let mut created = Vec::new();
        for task in creates {
            match task.await.unwrap() {
                Ok(project) => created.push(project.uuid),
                Err(err) => assert!(matches!(err, PlanningError::NotFound(_))),
            }
        }
        delete.await.unwrap().unwrap();

        for project_id in created {
            assert!(service.store().get_project(&project_id).unwrap().is_none());
        }
        assert!(service.store().list_projects_by_team(&team.uuid).unwrap().is_empty());
    }
}
