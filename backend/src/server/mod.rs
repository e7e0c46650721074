//! HTTP server assembly: session cookie, middleware and route table.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use collab_backend::Trace;
#[cfg(debug_assertions)]
use collab_backend::doc::ApiDoc;
use collab_backend::inbound::http::error::{json_error_handler, path_error_handler};
use collab_backend::inbound::http::health::{HealthState, live, ready};
use collab_backend::inbound::http::session_config::SessionSettings;
use collab_backend::inbound::http::state::HttpState;
use collab_backend::inbound::http::{projects, users};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_DAYS: i64 = 7;

/// Private (encrypted) cookie session that outlives browser restarts.
fn session_middleware(settings: SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_http_only(true)
        .cookie_secure(settings.cookie_secure)
        .cookie_same_site(settings.same_site)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(
            PersistentSession::default().session_ttl(CookieDuration::days(SESSION_TTL_DAYS)),
        )
        .build()
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Probes and docs sit outside the session scope so they never set cookies.
    let api = web::scope("")
        .wrap(session_middleware(session))
        .configure(users::configure)
        .configure(projects::configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.service(api)
}

/// Bind the listener and mark the process ready.
///
/// # Errors
/// Returns the [`std::io::Error`] raised when the address cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = state_builders::build_http_state(&config.store);
    let ServerConfig {
        session, bind_addr, ..
    } = config;

    let probes = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(probes.clone(), http_state.clone(), session.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;

    use super::config::Store;

    fn plain_http_session() -> SessionSettings {
        SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn built_app_serves_health_checks_and_sessions() {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let app = test::init_service(build_app(
            health,
            state_builders::build_http_state(&Store::Memory),
            plain_http_session(),
        ))
        .await;

        let readiness = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(readiness.status(), StatusCode::OK);
        assert!(readiness.response().cookies().next().is_none());

        let registered = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/users/register")
                .set_json(json!({ "email": "ada@example.com", "password": "secret" }))
                .to_request(),
        )
        .await;
        assert_eq!(registered.status(), StatusCode::CREATED);
        assert!(
            registered
                .response()
                .cookies()
                .any(|cookie| cookie.name() == SESSION_COOKIE)
        );
    }
}
