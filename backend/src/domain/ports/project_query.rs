//! Driving port for project reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Project, ProjectDetails, ProjectError};

/// Request to list the projects a user belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsRequest {
    pub user_id: Option<String>,
}

/// Request to fetch one project with members resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProjectRequest {
    pub project_id: Option<String>,
}

/// Driving port for project read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectQuery: Send + Sync {
    /// Every project whose member list contains the user. Order is
    /// unspecified.
    async fn list_for_user(
        &self,
        request: ListProjectsRequest,
    ) -> Result<Vec<Project>, ProjectError>;

    /// Fetch a project with its members resolved to user records.
    ///
    /// Absence is `Ok(None)`; the caller decides how to present it. No
    /// membership check is applied.
    async fn get_project(
        &self,
        request: GetProjectRequest,
    ) -> Result<Option<ProjectDetails>, ProjectError>;
}
