//! Project aggregate: a named workspace shared by an ordered member list.
//!
//! The first entry of the member list is the owner. Owners hold exclusive
//! delete rights and cannot be removed through membership changes.

mod error;
mod input;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use super::{User, UserId};

pub use self::error::{ForbiddenReason, ProjectError, ProjectField};
pub use self::input::{
    parse_file_tree, parse_member_list, parse_project_id, parse_project_name, parse_user_id,
};

/// Validation failures raised when assembling project values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectValidationError {
    /// Identifier text was not a UUID.
    #[error("project id must be a valid UUID")]
    InvalidId,
    /// Name was blank once trimmed.
    #[error("project name must not be empty")]
    EmptyName,
    /// The file tree was JSON `null`.
    #[error("file tree must not be null")]
    NullFileTree,
    /// The member list was empty, leaving the project without an owner.
    #[error("a project must have at least one member")]
    NoMembers,
}

/// Store-generated project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Parse a project identifier from text.
    ///
    /// # Examples
    /// ```
    /// use collab_backend::domain::ProjectId;
    ///
    /// let id = ProjectId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// assert!(ProjectId::new("nope").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(ProjectValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| ProjectValidationError::InvalidId)
    }

    /// Generate a fresh identifier. Stores call this when inserting.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read from a trusted source.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ProjectId> for String {
    fn from(value: ProjectId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ProjectId {
    type Error = ProjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique, trimmed project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate and construct a name, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ProjectName> for String {
    fn from(value: ProjectName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProjectName {
    type Error = ProjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque directory/file structure, replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct FileTree(Value);

impl FileTree {
    /// Wrap a JSON value, rejecting `null`.
    pub fn new(value: Value) -> Result<Self, ProjectValidationError> {
        if value.is_null() {
            return Err(ProjectValidationError::NullFileTree);
        }
        Ok(Self(value))
    }

    /// Tree assigned to freshly created projects.
    pub fn empty() -> Self {
        Self(json!({}))
    }

    /// Borrow the raw JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<FileTree> for Value {
    fn from(value: FileTree) -> Self {
        value.0
    }
}

impl TryFrom<Value> for FileTree {
    type Error = ProjectValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Input bundle for [`Project::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub id: ProjectId,
    pub name: ProjectName,
    pub users: Vec<UserId>,
    pub file_tree: FileTree,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted project.
///
/// ## Invariants
/// - `users` is non-empty; `users[0]` is the owner.
/// - `users` holds no duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    owner: UserId,
    users: Vec<UserId>,
    file_tree: FileTree,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Assemble a project, enforcing the owner invariant.
    pub fn new(draft: ProjectDraft) -> Result<Self, ProjectValidationError> {
        let ProjectDraft {
            id,
            name,
            users,
            file_tree,
            created_at,
            updated_at,
        } = draft;
        let Some(owner) = users.first().cloned() else {
            return Err(ProjectValidationError::NoMembers);
        };
        Ok(Self {
            id,
            name,
            owner,
            users,
            file_tree,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Members in insertion order, owner first.
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// The member holding delete rights.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn file_tree(&self) -> &FileTree {
        &self.file_tree
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user_id` is the owner.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner() == user_id
    }
}

/// Values needed to insert a project; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: ProjectName,
    pub owner: UserId,
    pub file_tree: FileTree,
}

impl NewProject {
    /// New project owned by `owner` with an empty tree.
    pub fn new(name: ProjectName, owner: UserId) -> Self {
        Self {
            name,
            owner,
            file_tree: FileTree::empty(),
        }
    }
}

/// Project with its member identifiers resolved to full user records.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDetails {
    pub project: Project,
    /// Resolved members in membership order. Identifiers whose user record has
    /// vanished are skipped.
    pub members: Vec<User>,
}
