//! Project API handlers.
//!
//! ```text
//! POST   /projects/create               {"name":"apollo"}
//! GET    /projects/all
//! PUT    /projects/add-user             {"projectId":"…","users":["…"]}
//! PUT    /projects/remove-user          {"projectId":"…","users":["…"]}
//! GET    /projects/get-project/{projectId}
//! PUT    /projects/update-file-tree     {"projectId":"…","fileTree":{…}}
//! DELETE /projects/delete/{projectId}
//! ```
//!
//! The acting user always comes from the session cookie, never the body.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::ports::{
    ChangeMembersRequest, CreateProjectRequest, DeleteProjectRequest, GetProjectRequest,
    ListProjectsRequest, UpdateFileTreeRequest,
};
use crate::domain::{Error, ProjectError, ProjectId, UserId};
use crate::inbound::http::ApiResult;
pub use crate::inbound::http::projects_dto::{
    ChangeMembersBody, CreateProjectBody, DeleteProjectResponseBody, ProjectDetailsResponse,
    ProjectResponse, UpdateFileTreeBody,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn change_members_request(body: ChangeMembersBody, requester: &UserId) -> ChangeMembersRequest {
    ChangeMembersRequest {
        project_id: body.project_id,
        users: body.users,
        requester_id: Some(requester.to_string()),
    }
}

/// Create a project owned by the session user.
#[utoipa::path(
    post,
    path = "/projects/create",
    request_body = CreateProjectBody,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Missing or invalid name", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 409, description = "Name already taken", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/create")]
pub async fn create_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateProjectBody>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user()?;
    let project = state
        .projects
        .create_project(CreateProjectRequest {
            name: payload.into_inner().name,
            user_id: Some(owner.to_string()),
        })
        .await?;
    Ok(HttpResponse::Created().json(ProjectResponse::from(project)))
}

/// List projects the session user belongs to.
#[utoipa::path(
    get,
    path = "/projects/all",
    responses(
        (status = 200, description = "Projects", body = [ProjectResponse]),
        (status = 401, description = "Login required", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["projects"],
    operation_id = "listProjects"
)]
#[get("/all")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ProjectResponse>>> {
    let user_id = session.require_user()?;
    let projects = state
        .projects_query
        .list_for_user(ListProjectsRequest {
            user_id: Some(user_id.to_string()),
        })
        .await?;
    Ok(web::Json(
        projects.into_iter().map(ProjectResponse::from).collect(),
    ))
}

/// Add users to a project the session user belongs to.
#[utoipa::path(
    put,
    path = "/projects/add-user",
    request_body = ChangeMembersBody,
    responses(
        (status = 200, description = "Updated project", body = ProjectResponse),
        (status = 400, description = "Missing or invalid input", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a member", body = Error),
        (status = 404, description = "Unknown users", body = Error)
    ),
    tags = ["projects"],
    operation_id = "addProjectUsers"
)]
#[put("/add-user")]
pub async fn add_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangeMembersBody>,
) -> ApiResult<web::Json<ProjectResponse>> {
    let requester = session.require_user()?;
    let project = state
        .projects
        .add_members(change_members_request(payload.into_inner(), &requester))
        .await?;
    Ok(web::Json(project.into()))
}

/// Remove users from a project the session user belongs to.
#[utoipa::path(
    put,
    path = "/projects/remove-user",
    request_body = ChangeMembersBody,
    responses(
        (status = 200, description = "Updated project", body = ProjectResponse),
        (status = 400, description = "Missing or invalid input", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a member, or owner removal", body = Error),
        (status = 404, description = "Unknown users or project", body = Error)
    ),
    tags = ["projects"],
    operation_id = "removeProjectUsers"
)]
#[put("/remove-user")]
pub async fn remove_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangeMembersBody>,
) -> ApiResult<web::Json<ProjectResponse>> {
    let requester = session.require_user()?;
    let project = state
        .projects
        .remove_members(change_members_request(payload.into_inner(), &requester))
        .await?;
    Ok(web::Json(project.into()))
}

/// Fetch a project with member records.
#[utoipa::path(
    get,
    path = "/projects/get-project/{projectId}",
    params(("projectId" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project", body = ProjectDetailsResponse),
        (status = 400, description = "Invalid project id", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such project", body = Error)
    ),
    tags = ["projects"],
    operation_id = "getProject"
)]
#[get("/get-project/{project_id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProjectDetailsResponse>> {
    session.require_user()?;
    let raw = path.into_inner();
    let details = state
        .projects_query
        .get_project(GetProjectRequest {
            project_id: Some(raw.clone()),
        })
        .await?;
    match details {
        Some(details) => Ok(web::Json(details.into())),
        None => Err(ProjectId::new(&raw).map_or_else(
            |_| Error::not_found("project not found"),
            |id| ProjectError::not_found(id).into(),
        )),
    }
}

/// Replace a project's file tree.
#[utoipa::path(
    put,
    path = "/projects/update-file-tree",
    request_body = UpdateFileTreeBody,
    responses(
        (status = 200, description = "Updated project", body = ProjectResponse),
        (status = 400, description = "Missing or invalid input", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such project", body = Error)
    ),
    tags = ["projects"],
    operation_id = "updateFileTree"
)]
#[put("/update-file-tree")]
pub async fn update_file_tree(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateFileTreeBody>,
) -> ApiResult<web::Json<ProjectResponse>> {
    session.require_user()?;
    let UpdateFileTreeBody {
        project_id,
        file_tree,
    } = payload.into_inner();
    let project = state
        .projects
        .update_file_tree(UpdateFileTreeRequest {
            project_id,
            file_tree,
        })
        .await?;
    Ok(web::Json(project.into()))
}

/// Delete a project owned by the session user.
#[utoipa::path(
    delete,
    path = "/projects/delete/{projectId}",
    params(("projectId" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Deleted", body = DeleteProjectResponseBody),
        (status = 400, description = "Invalid project id", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "No such project", body = Error)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/delete/{project_id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteProjectResponseBody>> {
    let requester = session.require_user()?;
    let response = state
        .projects
        .delete_project(DeleteProjectRequest {
            project_id: Some(path.into_inner()),
            requester_id: Some(requester.to_string()),
        })
        .await?;
    Ok(web::Json(DeleteProjectResponseBody {
        success: response.success,
    }))
}

/// Register every project handler on a `/projects` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(create_project)
            .service(list_projects)
            .service(add_users)
            .service(remove_users)
            .service(get_project)
            .service(update_file_tree)
            .service(delete_project),
    );
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
