//! Health probes.
//!
//! Liveness only says a worker is answering. Readiness waits until the
//! server has recorded how it was wired (the collection store in use and the
//! provider base URL lookups go to) and echoes that wiring back, so an
//! operator can tell which adapters a replica is running with.

use std::sync::OnceLock;

use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{HttpResponse, HttpResponseBuilder, get, web};
use serde::Serialize;
use serde_json::json;

/// Adapters a running server was built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wiring {
    /// Collection store backing the service.
    pub store: &'static str,
    /// Base URL of the music metadata provider.
    pub provider: String,
}

/// Readiness state shared with the probe handlers.
#[derive(Debug, Default)]
pub struct HealthState {
    wiring: OnceLock<Wiring>,
}

impl HealthState {
    /// State that reports not ready until [`HealthState::mark_ready`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the server's wiring and start reporting ready.
    ///
    /// The first wiring recorded is kept; later calls return `false`.
    pub fn mark_ready(&self, wiring: Wiring) -> bool {
        self.wiring.set(wiring).is_ok()
    }

    /// Wiring recorded at startup, if the server has got that far.
    pub fn wiring(&self) -> Option<&Wiring> {
        self.wiring.get()
    }
}

#[derive(Serialize)]
struct ReadinessBody<'a> {
    status: &'static str,
    #[serde(flatten)]
    wiring: Option<&'a Wiring>,
}

fn uncacheable(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder.insert_header(CacheControl(vec![CacheDirective::NoStore]));
    builder
}

/// Readiness probe. 200 with the server's wiring once it accepts traffic,
/// 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Ready; body names the store and provider in use"),
        (status = 503, description = "Still starting")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    match state.wiring() {
        Some(wiring) => uncacheable(HttpResponse::Ok()).json(ReadinessBody {
            status: "ready",
            wiring: Some(wiring),
        }),
        None => uncacheable(HttpResponse::ServiceUnavailable()).json(ReadinessBody {
            status: "starting",
            wiring: None,
        }),
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses((status = 200, description = "A worker is answering"))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    uncacheable(HttpResponse::Ok()).json(json!({ "status": "alive" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::App;
    use actix_web::test as actix_test;
    use rstest::{fixture, rstest};
    use serde_json::Value;

    #[fixture]
    fn wiring() -> Wiring {
        Wiring {
            store: "in-memory",
            provider: "https://api.discogs.com/".to_owned(),
        }
    }

    async fn probe(state: HealthState, path: &str) -> (StatusCode, Option<String>, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(ready)
                .service(live),
        )
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(path).to_request()).await;
        let status = res.status();
        let cache = res
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body: Value = actix_test::read_body_json(res).await;
        (status, cache, body)
    }

    #[actix_web::test]
    async fn readiness_waits_for_wiring() {
        let (status, cache, body) = probe(HealthState::new(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body, json!({ "status": "starting" }));
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_reports_the_wiring(wiring: Wiring) {
        let state = HealthState::new();
        assert!(state.mark_ready(wiring));

        let (status, _, body) = probe(state, "/health/ready").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "status": "ready",
                "store": "in-memory",
                "provider": "https://api.discogs.com/"
            })
        );
    }

    #[rstest]
    fn first_wiring_wins(wiring: Wiring) {
        let state = HealthState::new();
        assert!(state.mark_ready(wiring.clone()));
        assert!(!state.mark_ready(Wiring {
            provider: "http://localhost:9000/".to_owned(),
            ..wiring.clone()
        }));
        assert_eq!(state.wiring(), Some(&wiring));
    }

    #[actix_web::test]
    async fn liveness_answers_before_readiness() {
        let (status, cache, body) = probe(HealthState::new(), "/health/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body["status"], "alive");
    }
}
