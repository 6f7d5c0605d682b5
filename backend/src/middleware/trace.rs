//! Request tracing.
//!
//! Every request runs inside an `http_request` span named by its route
//! pattern (`/api/v1/users/{userID}/vinyl`, not the concrete path) with a
//! [`TraceId`] active for the handler. A caller may supply the identifier in
//! the `trace-id` header; anything [`TraceId::adopt`] refuses is replaced with
//! a fresh one. The identifier actually used is echoed in the response
//! header, and the span records the response status once the handler returns.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, Span, debug, error, field, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Span label for requests no route matched.
const UNMATCHED_ROUTE: &str = "<unmatched>";

/// Middleware giving each request a trace identifier and a route-named span.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use cratedig::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

/// The caller's identifier when it is acceptable, otherwise a fresh one.
fn request_trace_id(req: &ServiceRequest) -> (TraceId, bool) {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(TraceId::adopt)
        .map_or_else(|| (TraceId::generate(), false), |id| (id, true))
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let (trace_id, adopted) = request_trace_id(&req);
        let route = req
            .match_pattern()
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());
        let span = info_span!(
            "http_request",
            %trace_id,
            adopted,
            method = %req.method(),
            route,
            status = field::Empty,
        );
        let started = Instant::now();
        let fut = trace_id.scope(self.service.call(req));

        Box::pin(
            async move {
                let mut res = fut.await?;
                let status = res.status().as_u16();
                Span::current().record("status", status);
                debug!(status, elapsed = ?started.elapsed(), "request finished");

                match HeaderValue::from_str(&trace_id.to_string()) {
                    Ok(value) => {
                        res.headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(error) => error!(%error, "trace identifier is not a valid header value"),
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiResult, Error as DomainError};
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    const CALLER_ID: &str = "9b2f3c1e-6a4d-4f0e-8c7b-2d5e1f3a4b6c";

    async fn echo_current() -> HttpResponse {
        match TraceId::current() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn missing_record() -> ApiResult<HttpResponse> {
        Err(DomainError::not_found("no such record"))
    }

    /// Send one GET through the middleware, returning the echoed header and
    /// the body.
    async fn round_trip(uri: &str, inbound: Option<&str>) -> (String, web::Bytes) {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/users/{userID}/echo", web::get().to(echo_current))
                .route("/missing", web::get().to(missing_record)),
        )
        .await;
        let mut req = test::TestRequest::get().uri(uri);
        if let Some(value) = inbound {
            req = req.insert_header((TRACE_ID_HEADER, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        (header, test::read_body(res).await)
    }

    #[actix_web::test]
    async fn handler_sees_the_echoed_identifier() {
        let (header, body) = round_trip("/users/7/echo", None).await;
        assert!(TraceId::adopt(&header).is_some());
        assert_eq!(body, header.as_bytes());
    }

    #[actix_web::test]
    async fn adopts_the_callers_identifier() {
        let (header, body) = round_trip("/users/7/echo", Some(CALLER_ID)).await;
        assert_eq!(header, CALLER_ID);
        assert_eq!(body, CALLER_ID.as_bytes());
    }

    #[rstest]
    #[case("00000000-0000-0000-0000-000000000000")]
    #[case("gateway-request-17")]
    #[actix_web::test]
    async fn replaces_unacceptable_caller_identifiers(#[case] inbound: &str) {
        let (header, _) = round_trip("/users/7/echo", Some(inbound)).await;
        assert_ne!(header, inbound);
        assert!(TraceId::adopt(&header).is_some());
    }

    #[actix_web::test]
    async fn error_bodies_carry_the_identifier() {
        let (header, body) = round_trip("/missing", Some(CALLER_ID)).await;
        let error: DomainError = serde_json::from_slice(&body).expect("error body");
        assert_eq!(error.trace_id(), Some(header.as_str()));
    }

    #[actix_web::test]
    async fn unmatched_requests_still_get_an_identifier() {
        let (header, _) = round_trip("/nowhere", None).await;
        assert!(TraceId::adopt(&header).is_some());
    }
}
