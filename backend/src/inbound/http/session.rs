//! Signed-in user carried in the session cookie.
//!
//! Handlers see a [`SessionContext`] extractor and deal in [`UserId`]s. The
//! cookie holds only the id string under `user_id`; an entry that no longer
//! parses is treated as signed out.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{LocalBoxFuture, TryFutureExt};
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Session extractor exposing sign-in state.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Record `user_id` as signed in, rotating the session first.
    pub fn sign_in(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to write session: {error}")))
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| {
            UserId::new(&raw)
                .inspect_err(|error| warn!(%error, "ignoring session with malformed user id"))
                .ok()
        }))
    }

    /// The signed-in user, or `401 Unauthorized`.
    pub fn require_user(&self) -> Result<UserId, Error> {
        self.current_user()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Forget the user and expire the cookie.
    pub fn sign_out(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        Box::pin(Session::from_request(req, payload).map_ok(Self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_http::Request;
    use actix_web::body::MessageBody;
    use actix_web::cookie::Cookie;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use crate::inbound::http::test_utils::test_session_middleware;

    const ADA: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn sign_in_ada(session: SessionContext) -> Result<HttpResponse, Error> {
        session.sign_in(&UserId::new(ADA).expect("fixture id"))?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn store_garbage(session: Session) -> HttpResponse {
        session
            .insert(USER_ID_KEY, "not-a-uuid")
            .expect("insert raw value");
        HttpResponse::Ok().finish()
    }

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = session.require_user()?;
        Ok(HttpResponse::Ok().body(id.to_string()))
    }

    async fn sign_out(session: SessionContext) -> HttpResponse {
        session.sign_out();
        HttpResponse::Ok().finish()
    }

    async fn session_cookie<S, B>(app: &S, uri: &str) -> Cookie<'static>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let res = test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(Cookie::into_owned)
            .expect("session cookie set")
    }

    macro_rules! session_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .route("/sign-in", web::get().to(sign_in_ada))
                    .route("/garbage", web::get().to(store_garbage))
                    .route("/whoami", web::get().to(whoami))
                    .route("/sign-out", web::get().to(sign_out)),
            )
            .await
        };
    }

    #[rstest]
    #[actix_web::test]
    async fn signed_in_user_survives_the_round_trip() {
        let app = session_app!();
        let cookie = session_cookie(&app, "/sign-in").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, ADA);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("/garbage"))]
    #[actix_web::test]
    async fn absent_or_malformed_user_is_unauthorised(#[case] setup: Option<&str>) {
        let app = session_app!();
        let mut req = test::TestRequest::get().uri("/whoami");
        if let Some(uri) = setup {
            req = req.cookie(session_cookie(&app, uri).await);
        }

        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn sign_out_expires_the_cookie() {
        let app = session_app!();
        let signed_in = session_cookie(&app, "/sign-in").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/sign-out")
                .cookie(signed_in)
                .to_request(),
        )
        .await;
        let removal = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie set");
        assert_eq!(removal.value(), "");
    }
}
