//! Handler tests for the account endpoints.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::UserId;
use crate::inbound::http::test_utils::{
    MockPorts, configure_test_login, login_cookie, test_session_middleware,
};

const ADA: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
const GRACE: &str = "4fa85f64-5717-4562-b3fc-2c963f66afa7";

fn ada() -> User {
    User::try_from_strings(ADA, "ada@example.com").expect("fixture user")
}

macro_rules! test_app {
    ($ports:expr) => {
        test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data($ports.into_state())
                .configure(configure_test_login)
                .configure(configure),
        )
        .await
    };
}

async fn body_json<B: MessageBody>(res: ServiceResponse<B>) -> Value {
    let bytes = test::read_body(res).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}

fn session_cookie<B>(res: &ServiceResponse<B>) -> actix_web::cookie::Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie")
}

#[rstest]
#[case(json!({ "password": "secret" }), "email", "empty_email")]
#[case(json!({ "email": "not-an-email", "password": "secret" }), "email", "invalid_email")]
#[case(json!({ "email": "ada@example.com" }), "password", "empty_password")]
#[case(json!({ "email": "ada@example.com", "password": "ab" }), "password", "password_too_short")]
#[actix_web::test]
async fn register_rejects_invalid_credentials(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = test_app!(MockPorts::default());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/register")
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = body_json(res).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn register_starts_a_session() {
    let mut ports = MockPorts::default();
    ports
        .registration
        .expect_register()
        .withf(|creds| creds.email().to_string() == "ada@example.com" && creds.password() == "secret")
        .times(1)
        .returning(|_| Ok(ada()));
    ports
        .profile
        .expect_fetch_profile()
        .withf(|id| id.to_string() == ADA)
        .returning(|_| Ok(ada()));
    let app = test_app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/register")
            .set_json(json!({ "email": "Ada@Example.com", "password": "secret" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res);
    assert_eq!(body_json(res).await, json!({ "id": ADA, "email": "ada@example.com" }));

    let profile_res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(profile_res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn register_duplicate_email_is_conflict() {
    let mut ports = MockPorts::default();
    ports
        .registration
        .expect_register()
        .returning(|_| Err(Error::conflict("email already registered")));
    let app = test_app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/register")
            .set_json(json!({ "email": "ada@example.com", "password": "secret" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn login_returns_user_and_cookie() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .times(1)
        .returning(|_| Ok(ada()));
    let app = test_app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({ "email": "ada@example.com", "password": "secret" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let _cookie = session_cookie(&res);
    assert_eq!(body_json(res).await["email"], "ada@example.com");
}

#[rstest]
#[actix_web::test]
async fn login_with_wrong_password_is_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .returning(|_| Err(Error::unauthorized("invalid credentials")));
    let app = test_app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({ "email": "ada@example.com", "password": "wrong" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let value = body_json(res).await;
    assert_eq!(value["message"], "invalid credentials");
    assert_eq!(value["code"], "unauthorized");
}

#[rstest]
#[case("/users/logout")]
#[case("/users/profile")]
#[case("/users/all")]
#[actix_web::test]
async fn session_routes_reject_anonymous_requests(#[case] uri: &str) {
    let app = test_app!(MockPorts::default());

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn list_users_excludes_caller() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_list_users()
        .withf(|id| id.to_string() == ADA)
        .returning(|_| {
            Ok(vec![
                User::try_from_strings(GRACE, "grace@example.com").expect("fixture user"),
            ])
        });
    let app = test_app!(ports);
    let cookie = login_cookie(&app, &UserId::new(ADA).expect("fixture id")).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/all")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let value = body_json(res).await;
    assert_eq!(value, json!([{ "id": GRACE, "email": "grace@example.com" }]));
}

#[rstest]
#[actix_web::test]
async fn profile_of_vanished_user_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .profile
        .expect_fetch_profile()
        .returning(|_| Err(Error::not_found("user not found")));
    let app = test_app!(ports);
    let cookie = login_cookie(&app, &UserId::new(ADA).expect("fixture id")).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn logout_clears_the_session() {
    let app = test_app!(MockPorts::default());
    let cookie = login_cookie(&app, &UserId::new(ADA).expect("fixture id")).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let removal = session_cookie(&res);
    assert_eq!(removal.value(), "");

    let profile_res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/profile")
            .cookie(removal)
            .to_request(),
    )
    .await;
    assert_eq!(profile_res.status(), StatusCode::UNAUTHORIZED);
}
