//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (vinyl, crates,
//!   status, health)
//! - **Schemas**: the error wrappers ([`ErrorSchema`], [`ErrorCodeSchema`])
//!   plus one component per schema registry entry, injected by
//!   [`RegistryAddon`] so the document and the validator never drift apart
//!
//! The generated document is served by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, registry_components};

/// Inject every schema registry entry as a component.
struct RegistryAddon;

impl Modify for RegistryAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        for (name, schema) in registry_components() {
            components.schemas.insert(name, schema);
        }
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&RegistryAddon),
    info(
        title = "CrateDig catalogue API",
        description = "Vinyl collection tracking over a Discogs-style music metadata provider.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::vinyl::add_vinyl,
        crate::inbound::http::vinyl::put_vinyl,
        crate::inbound::http::vinyl::get_vinyl,
        crate::inbound::http::vinyl::remove_vinyl,
        crate::inbound::http::vinyl::list_vinyl,
        crate::inbound::http::crates::create_crate,
        crate::inbound::http::crates::get_crate,
        crate::inbound::http::crates::remove_crate,
        crate::inbound::http::status::describe_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "vinyl", description = "Records held in a user's collection"),
        (name = "crates", description = "Named groupings of a user's records"),
        (name = "status", description = "Music metadata provider response codes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
