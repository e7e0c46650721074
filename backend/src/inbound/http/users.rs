//! Account API handlers.
//!
//! ```text
//! POST /users/register {"email":"ada@example.com","password":"secret"}
//! POST /users/login    {"email":"ada@example.com","password":"secret"}
//! GET  /users/logout
//! GET  /users/profile
//! GET  /users/all
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Credentials, CredentialsValidationError, Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body of `POST /users/register` and `POST /users/login`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsBody {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "correct horse")]
    pub password: Option<String>,
}

impl CredentialsBody {
    fn parts(&self) -> (&str, &str) {
        (
            self.email.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
    }
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

/// Create an account and start a session for it.
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = CredentialsBody,
    responses(
        (status = 201, description = "Account created", body = User,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid email or password", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsBody>,
) -> ApiResult<HttpResponse> {
    let (email, password) = payload.parts();
    let credentials =
        Credentials::try_for_registration(email, password).map_err(map_credentials_error)?;
    let user = state.registration.register(&credentials).await?;
    session.sign_in(user.id())?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and start a session.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = CredentialsBody,
    responses(
        (status = 200, description = "Login success", body = User,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsBody>,
) -> ApiResult<web::Json<User>> {
    let (email, password) = payload.parts();
    let credentials = Credentials::try_from_parts(email, password).map_err(map_credentials_error)?;
    let user = state.login.authenticate(&credentials).await?;
    session.sign_in(user.id())?;
    Ok(web::Json(user))
}

/// End the current session.
#[utoipa::path(
    get,
    path = "/users/logout",
    responses(
        (status = 200, description = "Session cleared"),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "logout"
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.require_user()?;
    session.sign_out();
    Ok(HttpResponse::Ok().json(json!({ "message": "logged out" })))
}

/// Current user's account.
#[utoipa::path(
    get,
    path = "/users/profile",
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["users"],
    operation_id = "profile"
)]
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user()?;
    let user = state.profile.fetch_profile(&user_id).await?;
    Ok(web::Json(user))
}

/// Every account except the caller's.
#[utoipa::path(
    get,
    path = "/users/all",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/all")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    let user_id = session.require_user()?;
    let users = state.users.list_users(&user_id).await?;
    Ok(web::Json(users))
}

/// Register every account handler on a `/users` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(register)
            .service(login)
            .service(logout)
            .service(profile)
            .service(list_users),
    );
}

#[cfg(test)]
mod tests;
