//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod project_command;
mod project_query;
mod project_repository;
mod user_directory;
mod user_registration;
mod user_repository;

pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use project_command::MockProjectCommand;
pub use project_command::{
    ChangeMembersRequest, CreateProjectRequest, DeleteProjectRequest, DeleteProjectResponse,
    ProjectCommand, UpdateFileTreeRequest,
};
#[cfg(test)]
pub use project_query::MockProjectQuery;
pub use project_query::{GetProjectRequest, ListProjectsRequest, ProjectQuery};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use user_directory::{MockUserProfileQuery, MockUsersQuery};
pub use user_directory::{UserProfileQuery, UsersQuery};
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::UserRegistration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
