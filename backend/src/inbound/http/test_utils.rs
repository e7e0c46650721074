//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{
    MockLoginService, MockProjectCommand, MockProjectQuery, MockUserProfileQuery,
    MockUserRegistration, MockUsersQuery,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Session middleware with a fresh key, cookie name `session`, and no
/// `Secure` flag so plain-HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mock ports with no expectations; tests replace the ones they exercise.
pub struct MockPorts {
    pub projects: MockProjectCommand,
    pub projects_query: MockProjectQuery,
    pub login: MockLoginService,
    pub registration: MockUserRegistration,
    pub users: MockUsersQuery,
    pub profile: MockUserProfileQuery,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            projects: MockProjectCommand::new(),
            projects_query: MockProjectQuery::new(),
            login: MockLoginService::new(),
            registration: MockUserRegistration::new(),
            users: MockUsersQuery::new(),
            profile: MockUserProfileQuery::new(),
        }
    }
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            projects: Arc::new(self.projects),
            projects_query: Arc::new(self.projects_query),
            login: Arc::new(self.login),
            registration: Arc::new(self.registration),
            users: Arc::new(self.users),
            profile: Arc::new(self.profile),
        }))
    }
}

/// Path of the route installed by [`configure_test_login`].
pub const TEST_LOGIN_PATH: &str = "/test-login";

/// Route that stores `{id}` in the session so handlers see a logged-in user.
pub fn configure_test_login(cfg: &mut web::ServiceConfig) {
    cfg.route(
        &format!("{TEST_LOGIN_PATH}/{{id}}"),
        web::get().to(
            |session: SessionContext, path: web::Path<String>| async move {
                let id = UserId::new(path.into_inner())
                    .map_err(|err| Error::invalid_request(err.to_string()))?;
                session.sign_in(&id)?;
                Ok::<_, Error>(HttpResponse::Ok().finish())
            },
        ),
    );
}

/// Log `user_id` in through the test route and return the session cookie.
pub async fn login_cookie<S, B>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("{TEST_LOGIN_PATH}/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "test login failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
