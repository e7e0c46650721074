//! In-process store implementing the project and user repositories.
//!
//! Backs the server when no database URL is configured, and the HTTP and
//! integration tests. Each repository call takes the lock once, so every
//! individual call is atomic just like a single SQL statement.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::ports::{
    ProjectRepository, ProjectRepositoryError, StoredCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    EmailAddress, FileTree, NewProject, Project, ProjectDraft, ProjectId, ProjectName, User,
    UserId,
};

#[derive(Debug, Clone)]
struct ProjectRecord {
    id: ProjectId,
    name: ProjectName,
    users: Vec<UserId>,
    file_tree: FileTree,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    fn to_project(&self) -> Result<Project, ProjectRepositoryError> {
        Project::new(ProjectDraft {
            id: self.id,
            name: self.name.clone(),
            users: self.users.clone(),
            file_tree: self.file_tree.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
        .map_err(|err| ProjectRepositoryError::query(format!("corrupt project {}: {err}", self.id)))
    }
}

#[derive(Default)]
struct State {
    users: Vec<StoredCredentials>,
    projects: HashMap<ProjectId, ProjectRecord>,
}

/// Shared in-memory store. Clones share state.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Create an empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            clock,
        }
    }

    async fn mutate_project<F>(
        &self,
        id: &ProjectId,
        apply: F,
    ) -> Result<Option<Project>, ProjectRepositoryError>
    where
        F: FnOnce(&mut ProjectRecord) + Send,
    {
        let now = self.clock.utc();
        let mut state = self.state.write().await;
        let Some(record) = state.projects.get_mut(id) else {
            return Ok(None);
        };
        apply(record);
        record.updated_at = now;
        record.to_project().map(Some)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.state.write().await;
        if state
            .projects
            .values()
            .any(|record| record.name == project.name)
        {
            return Err(ProjectRepositoryError::duplicate_name(project.name.as_ref()));
        }
        let record = ProjectRecord {
            id: ProjectId::random(),
            name: project.name.clone(),
            users: vec![project.owner.clone()],
            file_tree: project.file_tree.clone(),
            created_at: now,
            updated_at: now,
        };
        let created = record.to_project()?;
        state.projects.insert(record.id, record);
        Ok(created)
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let state = self.state.read().await;
        state
            .projects
            .get(id)
            .map(ProjectRecord::to_project)
            .transpose()
    }

    async fn find_for_member(
        &self,
        id: &ProjectId,
        member: &UserId,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let state = self.state.read().await;
        state
            .projects
            .get(id)
            .filter(|record| record.users.contains(member))
            .map(ProjectRecord::to_project)
            .transpose()
    }

    async fn list_for_member(
        &self,
        member: &UserId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let state = self.state.read().await;
        state
            .projects
            .values()
            .filter(|record| record.users.contains(member))
            .map(ProjectRecord::to_project)
            .collect()
    }

    async fn add_members(
        &self,
        id: &ProjectId,
        users: &[UserId],
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        self.mutate_project(id, |record| {
            for user in users {
                if !record.users.contains(user) {
                    record.users.push(user.clone());
                }
            }
        })
        .await
    }

    async fn remove_members(
        &self,
        id: &ProjectId,
        users: &[UserId],
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        self.mutate_project(id, |record| {
            record.users.retain(|member| !users.contains(member));
        })
        .await
    }

    async fn replace_file_tree(
        &self,
        id: &ProjectId,
        file_tree: &FileTree,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let file_tree = file_tree.clone();
        self.mutate_project(id, move |record| record.file_tree = file_tree)
            .await
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, ProjectRepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.projects.remove(id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut state = self.state.write().await;
        if state
            .users
            .iter()
            .any(|stored| stored.user.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.push(StoredCredentials {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|stored| ids.contains(stored.user.id()))
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.email() == email)
            .cloned())
    }

    async fn list_except(&self, excluded: &UserId) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|stored| stored.user.id() != excluded)
            .map(|stored| stored.user.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory adapters.
    use chrono::TimeZone;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new(Arc::new(DefaultClock))
    }

    fn name(raw: &str) -> ProjectName {
        ProjectName::new(raw).expect("fixture name")
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_duplicate_names(store: InMemoryStore) {
        let owner = UserId::random();
        store
            .create(&NewProject::new(name("Alpha"), owner.clone()))
            .await
            .expect("first create");

        let error = store
            .create(&NewProject::new(name("Alpha"), owner))
            .await
            .expect_err("duplicate");

        assert_eq!(error, ProjectRepositoryError::duplicate_name("Alpha"));
    }

    #[rstest]
    #[tokio::test]
    async fn add_members_appends_only_new_ids(store: InMemoryStore) {
        let owner = UserId::random();
        let member = UserId::random();
        let project = store
            .create(&NewProject::new(name("Alpha"), owner.clone()))
            .await
            .expect("create");

        let updated = store
            .add_members(&project.id(), &[owner.clone(), member.clone()])
            .await
            .expect("add")
            .expect("project exists");

        assert_eq!(updated.users(), &[owner, member]);
    }

    #[rstest]
    #[tokio::test]
    async fn remove_members_keeps_remaining_order(store: InMemoryStore) {
        let owner = UserId::random();
        let first = UserId::random();
        let second = UserId::random();
        let project = store
            .create(&NewProject::new(name("Alpha"), owner.clone()))
            .await
            .expect("create");
        store
            .add_members(&project.id(), &[first.clone(), second.clone()])
            .await
            .expect("add");

        let updated = store
            .remove_members(&project.id(), &[first, UserId::random()])
            .await
            .expect("remove")
            .expect("project exists");

        assert_eq!(updated.users(), &[owner, second]);
    }

    #[rstest]
    #[tokio::test]
    async fn mutations_on_missing_projects_return_none(store: InMemoryStore) {
        let id = ProjectId::random();
        assert!(store.add_members(&id, &[]).await.expect("add").is_none());
        assert!(
            store
                .replace_file_tree(&id, &FileTree::empty())
                .await
                .expect("replace")
                .is_none()
        );
        assert!(!store.delete(&id).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn replace_file_tree_bumps_updated_at() {
        let mut clock = mockable::MockClock::new();
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("time");
        let edited = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).single().expect("time");
        let mut times = vec![edited, created].into_iter();
        clock
            .expect_utc()
            .times(2)
            .returning(move || times.next_back().expect("scripted time"));
        let store = InMemoryStore::new(Arc::new(clock));
        let project = store
            .create(&NewProject::new(name("Alpha"), UserId::random()))
            .await
            .expect("create");

        let tree = FileTree::new(json!({ "src": { "main.rs": {} } })).expect("tree");
        let updated = store
            .replace_file_tree(&project.id(), &tree)
            .await
            .expect("replace")
            .expect("project exists");

        assert_eq!(updated.file_tree(), &tree);
        assert_eq!(updated.created_at(), created);
        assert_eq!(updated.updated_at(), edited);
    }

    /// Projects `Alpha` (a), `Beta` (a, b) and `Gamma` (b, c) with members
    /// indexed as a = 0, b = 1, c = 2, plus `d` (3) who belongs nowhere.
    async fn seeded_memberships(store: &InMemoryStore) -> Vec<UserId> {
        let people: Vec<UserId> = (0..4).map(|_| UserId::random()).collect();
        let [a, b, c, _] = people.as_slice() else {
            panic!("four fixture users");
        };
        let plans = [
            ("Alpha", a, vec![]),
            ("Beta", a, vec![b.clone()]),
            ("Gamma", b, vec![c.clone()]),
        ];
        for (project, owner, members) in plans {
            let created = store
                .create(&NewProject::new(name(project), owner.clone()))
                .await
                .expect("create");
            store
                .add_members(&created.id(), &members)
                .await
                .expect("add")
                .expect("project exists");
        }
        people
    }

    #[rstest]
    #[case(0, &["Alpha", "Beta"])]
    #[case(1, &["Beta", "Gamma"])]
    #[case(2, &["Gamma"])]
    #[case(3, &[])]
    #[tokio::test]
    async fn list_for_member_returns_only_projects_containing_the_user(
        store: InMemoryStore,
        #[case] member: usize,
        #[case] expected: &[&str],
    ) {
        let people = seeded_memberships(&store).await;
        let who = people.get(member).expect("seeded member");

        let listed = store.list_for_member(who).await.expect("list");

        let mut names: Vec<String> = listed.iter().map(|p| p.name().to_string()).collect();
        names.sort();
        assert_eq!(names, expected);
        assert!(listed.iter().all(|project| project.users().contains(who)));
    }

    #[rstest]
    #[tokio::test]
    async fn replacing_the_file_tree_discards_the_previous_one(store: InMemoryStore) {
        let project = store
            .create(&NewProject::new(name("Alpha"), UserId::random()))
            .await
            .expect("create");
        let first = FileTree::new(json!({ "a": 1 })).expect("tree");
        let second = FileTree::new(json!({ "b": 2 })).expect("tree");

        store
            .replace_file_tree(&project.id(), &first)
            .await
            .expect("first replace");
        let updated = store
            .replace_file_tree(&project.id(), &second)
            .await
            .expect("second replace")
            .expect("project exists");

        assert_eq!(updated.file_tree().as_value(), &json!({ "b": 2 }));
        let stored = ProjectRepository::find_by_id(&store, &project.id())
            .await
            .expect("find")
            .expect("project exists");
        assert_eq!(stored.file_tree().as_value(), &json!({ "b": 2 }));
    }

    #[rstest]
    #[tokio::test]
    async fn users_are_unique_by_email(store: InMemoryStore) {
        let user = User::try_from_strings(UserId::random().as_ref(), "ada@example.com")
            .expect("fixture user");
        store.insert(&user, "hash").await.expect("insert");

        let twin = User::try_from_strings(UserId::random().as_ref(), "ada@example.com")
            .expect("fixture user");
        let error = store.insert(&twin, "hash").await.expect_err("duplicate");

        assert!(matches!(error, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn list_except_skips_requester(store: InMemoryStore) {
        let ada = User::try_from_strings(UserId::random().as_ref(), "ada@example.com")
            .expect("fixture user");
        let grace = User::try_from_strings(UserId::random().as_ref(), "grace@example.com")
            .expect("fixture user");
        store.insert(&ada, "hash").await.expect("insert");
        store.insert(&grace, "hash").await.expect("insert");

        let others = store.list_except(ada.id()).await.expect("list");

        assert_eq!(others, vec![grace]);
    }
}
