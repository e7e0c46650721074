//! Project request and response bodies.
//!
//! Request fields are optional so absent values reach the domain and are
//! reported as missing arguments instead of opaque deserialisation errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Project, ProjectDetails, User};

/// Body of `POST /projects/create`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectBody {
    #[schema(example = "apollo")]
    pub name: Option<String>,
}

/// Body of `PUT /projects/add-user` and `PUT /projects/remove-user`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMembersBody {
    pub project_id: Option<String>,
    /// Array of user id strings.
    #[schema(value_type = Option<Vec<String>>)]
    pub users: Option<Value>,
}

/// Body of `PUT /projects/update-file-tree`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileTreeBody {
    pub project_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub file_tree: Option<Value>,
}

/// Project with member ids, owner first.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub users: Vec<String>,
    #[schema(value_type = Object)]
    pub file_tree: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id().to_string(),
            name: project.name().to_string(),
            users: project.users().iter().map(ToString::to_string).collect(),
            file_tree: project.file_tree().as_value().clone(),
            created_at: project.created_at().to_rfc3339(),
            updated_at: project.updated_at().to_rfc3339(),
        }
    }
}

/// Project with members resolved to user records.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailsResponse {
    pub id: String,
    pub name: String,
    pub users: Vec<User>,
    #[schema(value_type = Object)]
    pub file_tree: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProjectDetails> for ProjectDetailsResponse {
    fn from(details: ProjectDetails) -> Self {
        let ProjectDetails { project, members } = details;
        Self {
            id: project.id().to_string(),
            name: project.name().to_string(),
            users: members,
            file_tree: project.file_tree().as_value().clone(),
            created_at: project.created_at().to_rfc3339(),
            updated_at: project.updated_at().to_rfc3339(),
        }
    }
}

/// Body returned by `DELETE /projects/delete/{projectId}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteProjectResponseBody {
    pub success: bool,
}
