//! Failure taxonomy for project operations.

use std::fmt;

use serde_json::json;

use crate::domain::{Error, UserId};

use super::ProjectId;

/// Request fields accepted by project operations, named as they appear on the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Name,
    ProjectId,
    UserId,
    Users,
    FileTree,
}

impl ProjectField {
    /// camelCase field name used in request bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ProjectId => "projectId",
            Self::UserId => "userId",
            Self::Users => "users",
            Self::FileTree => "fileTree",
        }
    }
}

impl fmt::Display for ProjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorisation rule a caller tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// Caller is not in the project's member list.
    NotMember,
    /// The removal list names the owner.
    OwnerRemoval,
    /// Only the owner may delete.
    NotOwner,
}

impl ForbiddenReason {
    /// Stable snake_case code for error details.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotMember => "not_member",
            Self::OwnerRemoval => "owner_removal",
            Self::NotOwner => "not_owner",
        }
    }
}

impl fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotMember => "user does not belong to this project",
            Self::OwnerRemoval => "cannot remove the project owner",
            Self::NotOwner => "only the project owner can delete the project",
        };
        f.write_str(message)
    }
}

fn join_ids(ids: &[UserId]) -> String {
    ids.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Errors returned by project driving ports.
///
/// Validation variants are raised before any store access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectError {
    /// A required input was absent or blank.
    #[error("{field} is required")]
    MissingArgument { field: ProjectField },
    /// An input was present but malformed.
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: ProjectField, reason: String },
    /// Another project already uses the name.
    #[error("project name already exists: {name}")]
    Conflict { name: String },
    /// Referenced users do not exist. Lists every offender.
    #[error("users with ids [{}] do not exist", join_ids(.ids))]
    UnknownUsers { ids: Vec<UserId> },
    /// The caller is not allowed to perform the mutation.
    #[error("{reason}")]
    Forbidden { reason: ForbiddenReason },
    /// No project matches the identifier.
    #[error("project {project_id} not found")]
    NotFound { project_id: ProjectId },
    /// The store could not be reached.
    #[error("project store unavailable: {message}")]
    Unavailable { message: String },
    /// The store failed while executing the operation.
    #[error("project store failure: {message}")]
    Internal { message: String },
}

impl ProjectError {
    pub fn missing(field: ProjectField) -> Self {
        Self::MissingArgument { field }
    }

    pub fn invalid(field: ProjectField, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: ForbiddenReason) -> Self {
        Self::Forbidden { reason }
    }

    pub fn not_found(project_id: ProjectId) -> Self {
        Self::NotFound { project_id }
    }
}

impl From<ProjectError> for Error {
    fn from(value: ProjectError) -> Self {
        let message = value.to_string();
        match value {
            ProjectError::MissingArgument { field } => Error::invalid_request(message)
                .with_details(json!({ "field": field.as_str(), "code": "missing_argument" })),
            ProjectError::InvalidArgument { field, .. } => Error::invalid_request(message)
                .with_details(json!({ "field": field.as_str(), "code": "invalid_argument" })),
            ProjectError::Conflict { name } => Error::conflict(message)
                .with_details(json!({ "field": "name", "value": name, "code": "duplicate_name" })),
            ProjectError::UnknownUsers { ids } => {
                let ids: Vec<String> = ids.into_iter().map(String::from).collect();
                Error::not_found(message).with_details(json!({ "code": "unknown_users", "ids": ids }))
            }
            ProjectError::Forbidden { reason } => {
                Error::forbidden(message).with_details(json!({ "code": reason.code() }))
            }
            ProjectError::NotFound { project_id } => Error::not_found(message)
                .with_details(json!({ "projectId": project_id.to_string() })),
            ProjectError::Unavailable { .. } => Error::service_unavailable(message),
            ProjectError::Internal { .. } => Error::internal(message),
        }
    }
}
