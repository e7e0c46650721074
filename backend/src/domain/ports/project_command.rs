//! Driving port for project mutations.
//!
//! Requests carry raw, unvalidated inputs so every adapter shares one
//! validation order: presence first, then shape, field by field.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Project, ProjectError};

/// Request to create a project owned by `user_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub user_id: Option<String>,
}

/// Request to add or remove members on behalf of `requester_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMembersRequest {
    pub project_id: Option<String>,
    pub users: Option<Value>,
    pub requester_id: Option<String>,
}

/// Request to replace a project's file tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileTreeRequest {
    pub project_id: Option<String>,
    pub file_tree: Option<Value>,
}

/// Request to delete a project on behalf of `requester_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectRequest {
    pub project_id: Option<String>,
    pub requester_id: Option<String>,
}

/// Acknowledgement returned after a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProjectResponse {
    pub success: bool,
}

/// Driving port for project write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectCommand: Send + Sync {
    /// Create a project whose only member is the requesting user.
    ///
    /// Fails with `Conflict` when the trimmed name is already taken.
    async fn create_project(&self, request: CreateProjectRequest)
    -> Result<Project, ProjectError>;

    /// Add users to a project the requester belongs to.
    ///
    /// Ids already present are kept once; new ids append in request order.
    async fn add_members(&self, request: ChangeMembersRequest) -> Result<Project, ProjectError>;

    /// Remove users from a project the requester belongs to.
    ///
    /// The owner cannot be removed. Ids not currently members are ignored.
    async fn remove_members(&self, request: ChangeMembersRequest)
    -> Result<Project, ProjectError>;

    /// Replace the file tree of an existing project.
    async fn update_file_tree(
        &self,
        request: UpdateFileTreeRequest,
    ) -> Result<Project, ProjectError>;

    /// Delete a project. Only the owner may do so.
    async fn delete_project(
        &self,
        request: DeleteProjectRequest,
    ) -> Result<DeleteProjectResponse, ProjectError>;
}
