//! Server construction and middleware wiring.

mod config;

pub use config::AppSettings;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::{info, warn};

use cratedig::Trace;
#[cfg(debug_assertions)]
use cratedig::doc::ApiDoc;
use cratedig::domain::CollectionService;
use cratedig::inbound::http::crates::{create_crate, get_crate, remove_crate};
use cratedig::inbound::http::health::{HealthState, Wiring, live, ready};
use cratedig::inbound::http::state::HttpState;
use cratedig::inbound::http::status::describe_status;
use cratedig::inbound::http::vinyl::{add_vinyl, get_vinyl, list_vinyl, put_vinyl, remove_vinyl};
use cratedig::outbound::discogs::DiscogsHttpSource;
use cratedig::outbound::persistence::InMemoryCollectionRepository;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

/// Wire the collection service over the in-memory store and the provider
/// adapter described by `settings`, returning the state alongside a record
/// of what was wired for the readiness probe.
///
/// # Errors
/// Returns [`std::io::Error`] when the provider URL does not parse or the
/// HTTP client cannot be built.
fn build_http_state(settings: &AppSettings) -> std::io::Result<(web::Data<HttpState>, Wiring)> {
    let base_url = settings.provider_base_url().map_err(|e| {
        std::io::Error::other(format!("invalid provider base URL: {e}"))
    })?;
    let wiring = Wiring {
        store: InMemoryCollectionRepository::KIND,
        provider: base_url.to_string(),
    };
    let catalogue = DiscogsHttpSource::new(base_url, settings.provider_timeout())
        .map_err(|e| std::io::Error::other(format!("provider client setup failed: {e}")))?;
    let service = Arc::new(CollectionService::new(
        Arc::new(InMemoryCollectionRepository::new()),
        Arc::new(catalogue),
        Arc::new(DefaultClock),
    ));
    Ok((web::Data::new(HttpState::new(service.clone(), service)), wiring))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(list_vinyl)
        .service(add_vinyl)
        .service(put_vinyl)
        .service(get_vinyl)
        .service(remove_vinyl)
        .service(create_crate)
        .service(get_crate)
        .service(remove_crate)
        .service(describe_status);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and settings.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `settings`: listener and provider settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when wiring adapters, binding the socket or
/// starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &AppSettings,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let (http_state, wiring) = build_http_state(settings)?;
    let bind_addr = settings.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, store = wiring.store, provider = %wiring.provider, "listening");
    if !health_state.mark_ready(wiring) {
        warn!("readiness was already recorded; keeping the first wiring");
    }
    Ok(server)
}
