//! OpenAPI documentation for the REST API.
//!
//! Served by Swagger UI in debug builds and exported by the `openapi-dump`
//! binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, User};
use crate::inbound::http::projects::{
    ChangeMembersBody, CreateProjectBody, DeleteProjectResponseBody, ProjectDetailsResponse,
    ProjectResponse, UpdateFileTreeBody,
};
use crate::inbound::http::users::CredentialsBody;

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /users/login or POST /users/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Collaborative projects API",
        description = "Projects with shared membership and a JSON file tree, plus session-based accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::profile,
        crate::inbound::http::users::list_users,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::add_users,
        crate::inbound::http::projects::remove_users,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::update_file_tree,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Error,
        ErrorCode,
        CredentialsBody,
        CreateProjectBody,
        ChangeMembersBody,
        UpdateFileTreeBody,
        ProjectResponse,
        ProjectDetailsResponse,
        DeleteProjectResponseBody
    )),
    tags(
        (name = "users", description = "Accounts and sessions"),
        (name = "projects", description = "Project membership and file trees"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
