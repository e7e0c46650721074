//! Shared helpers for HTTP integration tests.

use std::sync::Arc;

use actix_http::Request;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use collab_backend::Trace;
use collab_backend::domain::ports::FixturePasswordHasher;
use collab_backend::domain::{AccountService, ProjectService};
use collab_backend::inbound::http::error::json_error_handler;
use collab_backend::inbound::http::state::{HttpState, HttpStatePorts};
use collab_backend::inbound::http::{projects, users};
use collab_backend::outbound::InMemoryStore;

/// Handler state backed by one in-memory store and the fixture hasher.
pub fn memory_state() -> web::Data<HttpState> {
    let store = Arc::new(InMemoryStore::new(Arc::new(DefaultClock)));
    let projects = Arc::new(ProjectService::new(store.clone(), store.clone()));
    let accounts = Arc::new(AccountService::new(store, Arc::new(FixturePasswordHasher)));
    web::Data::new(HttpState::new(HttpStatePorts {
        projects: projects.clone(),
        projects_query: projects,
        login: accounts.clone(),
        registration: accounts.clone(),
        users: accounts.clone(),
        profile: accounts,
    }))
}

/// App wired like production minus Swagger and health probes.
pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(
            web::scope("")
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".to_owned())
                        .cookie_secure(false)
                        .build(),
                )
                .configure(users::configure)
                .configure(projects::configure),
        )
}

/// Status and decoded JSON body of a response.
pub async fn read<B: MessageBody>(res: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

/// Register an account and return its id and session cookie.
pub async fn register<S, B>(app: &S, email: &str) -> (String, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/users/register")
            .set_json(json!({ "email": email, "password": "secret" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED, "registering {email}");
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie");
    let (_, body) = read(res).await;
    let id = body["id"].as_str().expect("user id").to_owned();
    (id, cookie)
}
