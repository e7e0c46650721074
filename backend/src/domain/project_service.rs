//! Project domain service.
//!
//! Implements the project driving ports on top of the project and user
//! repositories. Authorisation checks and the subsequent write are separate
//! store calls; a concurrent membership change between them is not detected.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    ChangeMembersRequest, CreateProjectRequest, DeleteProjectRequest, DeleteProjectResponse,
    GetProjectRequest, ListProjectsRequest, ProjectCommand, ProjectQuery, ProjectRepository,
    ProjectRepositoryError, UpdateFileTreeRequest, UserPersistenceError, UserRepository,
};
use crate::domain::{
    ForbiddenReason, NewProject, Project, ProjectDetails, ProjectError, ProjectField, ProjectId,
    UserId, parse_file_tree, parse_member_list, parse_project_id, parse_project_name,
    parse_user_id,
};

fn map_project_repository_error(error: ProjectRepositoryError) -> ProjectError {
    match error {
        ProjectRepositoryError::Connection { message } => {
            error!(%message, "project repository unavailable");
            ProjectError::Unavailable {
                message: format!("project repository unavailable: {message}"),
            }
        }
        ProjectRepositoryError::Query { message } => {
            error!(%message, "project repository query failed");
            ProjectError::Internal {
                message: format!("project repository error: {message}"),
            }
        }
        ProjectRepositoryError::DuplicateName { name } => ProjectError::Conflict { name },
    }
}

fn map_user_repository_error(error: UserPersistenceError) -> ProjectError {
    match error {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            ProjectError::Unavailable {
                message: format!("user repository unavailable: {message}"),
            }
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            ProjectError::Internal {
                message: format!("user repository error: {message}"),
            }
        }
        UserPersistenceError::DuplicateEmail { email } => ProjectError::Internal {
            message: format!("unexpected duplicate email during project operation: {email}"),
        },
    }
}

/// Validated inputs shared by add and remove.
struct MembershipChange {
    project_id: ProjectId,
    users: Vec<UserId>,
    requester: UserId,
}

impl MembershipChange {
    fn parse(request: &ChangeMembersRequest) -> Result<Self, ProjectError> {
        let project_id = parse_project_id(request.project_id.as_deref())?;
        let users = parse_member_list(request.users.as_ref())?;
        let requester = parse_user_id(ProjectField::UserId, request.requester_id.as_deref())?;
        Ok(Self {
            project_id,
            users,
            requester,
        })
    }
}

/// Project service implementing [`ProjectCommand`] and [`ProjectQuery`].
#[derive(Clone)]
pub struct ProjectService<P, U> {
    projects: Arc<P>,
    users: Arc<U>,
}

impl<P, U> ProjectService<P, U> {
    /// Create a service over the project and user repositories.
    pub fn new(projects: Arc<P>, users: Arc<U>) -> Self {
        Self { projects, users }
    }
}

impl<P, U> ProjectService<P, U>
where
    P: ProjectRepository,
    U: UserRepository,
{
    /// Fail with every id that has no user record, in request order.
    async fn ensure_users_exist(&self, ids: &[UserId]) -> Result<(), ProjectError> {
        if ids.is_empty() {
            return Ok(());
        }
        let found = self
            .users
            .find_by_ids(ids)
            .await
            .map_err(map_user_repository_error)?;
        let known: HashSet<&UserId> = found.iter().map(|user| user.id()).collect();
        let missing: Vec<UserId> = ids
            .iter()
            .filter(|id| !known.contains(id))
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProjectError::UnknownUsers { ids: missing })
        }
    }

    /// Load the project only if the requester belongs to it.
    async fn require_membership(
        &self,
        project_id: &ProjectId,
        requester: &UserId,
    ) -> Result<Project, ProjectError> {
        let project = self
            .projects
            .find_for_member(project_id, requester)
            .await
            .map_err(map_project_repository_error)?;
        project.ok_or_else(|| {
            warn!(%project_id, %requester, "membership change by non-member");
            ProjectError::forbidden(ForbiddenReason::NotMember)
        })
    }
}

#[async_trait]
impl<P, U> ProjectCommand for ProjectService<P, U>
where
    P: ProjectRepository,
    U: UserRepository,
{
    async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<Project, ProjectError> {
        let name = parse_project_name(request.name.as_deref())?;
        let owner = parse_user_id(ProjectField::UserId, request.user_id.as_deref())?;

        let project = self
            .projects
            .create(&NewProject::new(name, owner))
            .await
            .map_err(map_project_repository_error)?;
        info!(project_id = %project.id(), name = %project.name(), "project created");
        Ok(project)
    }

    async fn add_members(&self, request: ChangeMembersRequest) -> Result<Project, ProjectError> {
        let change = MembershipChange::parse(&request)?;
        self.ensure_users_exist(&change.users).await?;
        self.require_membership(&change.project_id, &change.requester)
            .await?;

        let updated = self
            .projects
            .add_members(&change.project_id, &change.users)
            .await
            .map_err(map_project_repository_error)?
            .ok_or_else(|| ProjectError::not_found(change.project_id))?;
        info!(
            project_id = %change.project_id,
            added = change.users.len(),
            "project members added"
        );
        Ok(updated)
    }

    async fn remove_members(
        &self,
        request: ChangeMembersRequest,
    ) -> Result<Project, ProjectError> {
        let change = MembershipChange::parse(&request)?;
        self.ensure_users_exist(&change.users).await?;
        let project = self
            .require_membership(&change.project_id, &change.requester)
            .await?;

        if change.users.contains(project.owner()) {
            warn!(project_id = %change.project_id, "attempt to remove project owner");
            return Err(ProjectError::forbidden(ForbiddenReason::OwnerRemoval));
        }

        let updated = self
            .projects
            .remove_members(&change.project_id, &change.users)
            .await
            .map_err(map_project_repository_error)?
            .ok_or_else(|| ProjectError::not_found(change.project_id))?;
        info!(
            project_id = %change.project_id,
            removed = change.users.len(),
            "project members removed"
        );
        Ok(updated)
    }

    async fn update_file_tree(
        &self,
        request: UpdateFileTreeRequest,
    ) -> Result<Project, ProjectError> {
        let project_id = parse_project_id(request.project_id.as_deref())?;
        let file_tree = parse_file_tree(request.file_tree)?;

        let updated = self
            .projects
            .replace_file_tree(&project_id, &file_tree)
            .await
            .map_err(map_project_repository_error)?
            .ok_or_else(|| ProjectError::not_found(project_id))?;
        info!(%project_id, "project file tree replaced");
        Ok(updated)
    }

    async fn delete_project(
        &self,
        request: DeleteProjectRequest,
    ) -> Result<DeleteProjectResponse, ProjectError> {
        let project_id = parse_project_id(request.project_id.as_deref())?;
        let requester = parse_user_id(ProjectField::UserId, request.requester_id.as_deref())?;

        let project = self
            .projects
            .find_by_id(&project_id)
            .await
            .map_err(map_project_repository_error)?
            .ok_or_else(|| ProjectError::not_found(project_id))?;
        if !project.is_owner(&requester) {
            warn!(%project_id, %requester, "delete attempted by non-owner");
            return Err(ProjectError::forbidden(ForbiddenReason::NotOwner));
        }

        self.projects
            .delete(&project_id)
            .await
            .map_err(map_project_repository_error)?;
        info!(%project_id, "project deleted");
        Ok(DeleteProjectResponse { success: true })
    }
}

#[async_trait]
impl<P, U> ProjectQuery for ProjectService<P, U>
where
    P: ProjectRepository,
    U: UserRepository,
{
    async fn list_for_user(
        &self,
        request: ListProjectsRequest,
    ) -> Result<Vec<Project>, ProjectError> {
        let user_id = parse_user_id(ProjectField::UserId, request.user_id.as_deref())?;
        self.projects
            .list_for_member(&user_id)
            .await
            .map_err(map_project_repository_error)
    }

    async fn get_project(
        &self,
        request: GetProjectRequest,
    ) -> Result<Option<ProjectDetails>, ProjectError> {
        let project_id = parse_project_id(request.project_id.as_deref())?;
        let Some(project) = self
            .projects
            .find_by_id(&project_id)
            .await
            .map_err(map_project_repository_error)?
        else {
            return Ok(None);
        };

        let found = self
            .users
            .find_by_ids(project.users())
            .await
            .map_err(map_user_repository_error)?;
        let members = project
            .users()
            .iter()
            .filter_map(|id| found.iter().find(|user| user.id() == id).cloned())
            .collect();
        Ok(Some(ProjectDetails { project, members }))
    }
}

#[cfg(test)]
#[path = "project_service_tests.rs"]
mod tests;
