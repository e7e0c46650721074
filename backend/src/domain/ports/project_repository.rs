//! Port for project persistence.
//!
//! Membership mutations are single atomic statements in the store. Callers
//! perform authorisation checks beforehand; nothing here wraps check and write
//! in a transaction.

use async_trait::async_trait;

use crate::domain::{FileTree, NewProject, Project, ProjectId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "project repository query failed: {message}",
        /// The unique index on project names rejected the write.
        DuplicateName { name: String } =>
            "project name already exists: {name}",
    }
}

/// Port for reading and mutating projects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a project owned by `project.owner`, assigning id and timestamps.
    async fn create(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError>;

    /// Fetch a project by id.
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Fetch a project only if `member` currently belongs to it.
    async fn find_for_member(
        &self,
        id: &ProjectId,
        member: &UserId,
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    /// List every project whose member list contains `member`.
    async fn list_for_member(&self, member: &UserId)
    -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Append the ids not yet present, preserving existing order.
    ///
    /// Returns `None` when the project no longer exists.
    async fn add_members(
        &self,
        id: &ProjectId,
        users: &[UserId],
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Remove every listed id, preserving the order of those left.
    ///
    /// Returns `None` when the project no longer exists.
    async fn remove_members(
        &self,
        id: &ProjectId,
        users: &[UserId],
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Replace the file tree wholesale.
    ///
    /// Returns `None` when the project does not exist.
    async fn replace_file_tree(
        &self,
        id: &ProjectId,
        file_tree: &FileTree,
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Delete the project. Returns whether a record was removed.
    async fn delete(&self, id: &ProjectId) -> Result<bool, ProjectRepositoryError>;
}
