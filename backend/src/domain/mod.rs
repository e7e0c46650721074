//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - [`Error`]: API error response payload.
//! - [`ErrorCode`]: stable error identifier.
//! - [`User`]: account identity and email.
//! - [`Project`]: shared workspace, owner first.
//! - [`ProjectError`]: project failures.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod project;
pub mod project_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{Credentials, CredentialsValidationError, PASSWORD_MIN};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::project::{
    FileTree, ForbiddenReason, NewProject, Project, ProjectDetails, ProjectDraft, ProjectError,
    ProjectField, ProjectId, ProjectName, ProjectValidationError, parse_file_tree,
    parse_member_list, parse_project_id, parse_project_name, parse_user_id,
};
pub use self::project_service::ProjectService;
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, User, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use collab_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
