//! Parsing of raw operation inputs into typed project values.
//!
//! Each helper checks presence first and shape second, so callers reproduce a
//! stable validation order by invoking them in field order.

use serde_json::Value;

use crate::domain::UserId;

use super::{FileTree, ProjectError, ProjectField, ProjectId, ProjectName};

fn present(field: ProjectField, raw: Option<&str>) -> Result<&str, ProjectError> {
    match raw {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ProjectError::missing(field)),
    }
}

/// Parse a required project identifier.
///
/// # Examples
/// ```
/// use collab_backend::domain::{ProjectError, ProjectField, parse_project_id};
///
/// assert_eq!(
///     parse_project_id(None),
///     Err(ProjectError::MissingArgument { field: ProjectField::ProjectId })
/// );
/// assert!(matches!(
///     parse_project_id(Some("xyz")),
///     Err(ProjectError::InvalidArgument { .. })
/// ));
/// ```
pub fn parse_project_id(raw: Option<&str>) -> Result<ProjectId, ProjectError> {
    let value = present(ProjectField::ProjectId, raw)?;
    ProjectId::new(value)
        .map_err(|_| ProjectError::invalid(ProjectField::ProjectId, "must be a valid UUID"))
}

/// Parse a required user identifier reported under `field`.
pub fn parse_user_id(field: ProjectField, raw: Option<&str>) -> Result<UserId, ProjectError> {
    let value = present(field, raw)?;
    UserId::new(value).map_err(|_| ProjectError::invalid(field, "must be a valid UUID"))
}

/// Parse a required project name. Whitespace-only names count as absent.
pub fn parse_project_name(raw: Option<&str>) -> Result<ProjectName, ProjectError> {
    let value = present(ProjectField::Name, raw)?;
    ProjectName::new(value).map_err(|_| ProjectError::missing(ProjectField::Name))
}

/// Parse the `users` list of a membership change.
///
/// The value must be a JSON array of UUID strings. Duplicate entries collapse
/// to their first occurrence; an empty array is accepted.
///
/// # Examples
/// ```
/// use collab_backend::domain::parse_member_list;
/// use serde_json::json;
///
/// let id = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
/// let users = parse_member_list(Some(&json!([id, id]))).expect("valid list");
/// assert_eq!(users.len(), 1);
/// assert!(parse_member_list(Some(&json!(id))).is_err());
/// ```
pub fn parse_member_list(raw: Option<&Value>) -> Result<Vec<UserId>, ProjectError> {
    let items = match raw {
        None | Some(Value::Null) => return Err(ProjectError::missing(ProjectField::Users)),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ProjectError::invalid(
                ProjectField::Users,
                "must be an array of user ids",
            ));
        }
    };

    let mut parsed: Vec<UserId> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let id = item
            .as_str()
            .and_then(|text| UserId::new(text).ok())
            .ok_or_else(|| {
                ProjectError::invalid(
                    ProjectField::Users,
                    format!("entry {index} is not a valid user id"),
                )
            })?;
        if !parsed.contains(&id) {
            parsed.push(id);
        }
    }
    Ok(parsed)
}

/// Parse a replacement file tree. JSON `null` counts as absent.
pub fn parse_file_tree(raw: Option<Value>) -> Result<FileTree, ProjectError> {
    let value = raw.ok_or_else(|| ProjectError::missing(ProjectField::FileTree))?;
    FileTree::new(value).map_err(|_| ProjectError::missing(ProjectField::FileTree))
}
