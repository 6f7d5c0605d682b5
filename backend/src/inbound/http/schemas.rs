//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! in the inbound adapter layer where framework concerns belong.
//!
//! Registry entries are rendered rather than restated: [`registry_components`]
//! turns every [`crate::domain::schema::Schema`] into a component, and the
//! marker types below name those components in handler annotations. The
//! document and the validator therefore share one definition.

use std::borrow::Cow;

use utoipa::openapi::schema::{
    ArrayBuilder, KnownFormat, ObjectBuilder, Schema, SchemaFormat, Type,
};
use utoipa::openapi::{Ref, RefOr};
use utoipa::{PartialSchema, ToSchema};

use crate::domain::schema::{Constraint, Field, SchemaName, SchemaRegistry};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request could not be parsed.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// One or more fields broke their declared rule.
    #[schema(rename = "validation_failed")]
    ValidationFailed,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The write would collide with a record already held.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency refused or could not serve the request.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// The music metadata provider failed.
    #[schema(rename = "upstream_failure")]
    UpstreamFailure,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "validation_failed")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "VinylParams validation failed with 1 violation(s)")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the list of violations.
    details: Option<serde_json::Value>,
}

fn scalar(schema_type: Type) -> ObjectBuilder {
    ObjectBuilder::new().schema_type(schema_type)
}

fn render_constraint(constraint: &Constraint) -> RefOr<Schema> {
    match constraint {
        Constraint::Integer => scalar(Type::Integer).into(),
        Constraint::PositiveInt => scalar(Type::Integer).minimum(Some(1)).into(),
        Constraint::Number => scalar(Type::Number).into(),
        Constraint::Boolean => scalar(Type::Boolean).into(),
        Constraint::String => scalar(Type::String).into(),
        Constraint::NonEmptyString => scalar(Type::String).min_length(Some(1)).into(),
        Constraint::UrlString => scalar(Type::String)
            .format(Some(SchemaFormat::Custom("uri".to_owned())))
            .into(),
        Constraint::IsoDate => scalar(Type::String)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Date)))
            .into(),
        Constraint::EnumMember(labels) => scalar(Type::String)
            .enum_values(Some(labels.iter().copied()))
            .into(),
        Constraint::Optional(inner) => render_constraint(inner),
        Constraint::ArrayOf(inner) => ArrayBuilder::new().items(render_constraint(inner)).into(),
        Constraint::Schema(name) => RefOr::Ref(Ref::from_schema_name(name.as_str())),
        Constraint::Object(fields) => RefOr::T(render_object(fields, None)),
    }
}

fn render_object(fields: &[Field], description: Option<&str>) -> Schema {
    let builder = fields.iter().fold(
        scalar(Type::Object).description(description),
        |builder, field| {
            let builder = builder.property(field.name(), render_constraint(field.constraint()));
            if field.constraint().accepts_absent() {
                builder
            } else {
                builder.required(field.name())
            }
        },
    );
    Schema::Object(builder.build())
}

/// Render the registry entry `name` as an OpenAPI schema.
pub fn render_schema(name: SchemaName) -> RefOr<Schema> {
    let registry = SchemaRegistry::global();
    match registry.get(name) {
        Some(schema) => RefOr::T(render_object(schema.fields(), Some(schema.description()))),
        None => RefOr::T(Schema::Object(ObjectBuilder::new().build())),
    }
}

/// Every registry entry as an `(component name, schema)` pair.
pub fn registry_components() -> Vec<(String, RefOr<Schema>)> {
    SchemaRegistry::global()
        .iter()
        .map(|schema| {
            (
                schema.name().as_str().to_owned(),
                RefOr::T(render_object(schema.fields(), Some(schema.description()))),
            )
        })
        .collect()
}

macro_rules! registry_schema {
    ($($(#[$meta:meta])* $marker:ident => $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub struct $marker;

            impl PartialSchema for $marker {
                fn schema() -> RefOr<Schema> {
                    render_schema(SchemaName::$name)
                }
            }

            impl ToSchema for $marker {
                fn name() -> Cow<'static, str> {
                    Cow::Borrowed(SchemaName::$name.as_str())
                }
            }
        )+
    };
}

registry_schema! {
    /// Body of the vinyl store routes.
    VinylDetailsBody => VinylDetails,
    /// Body of the crate creation route.
    NewCrateBody => NewCrate,
    /// A stored or fetched vinyl record.
    AddVinylResponseBody => AddVinylResponse,
    /// A page of a user's collection.
    CrateListResponseBody => CrateListResponse,
    /// A created crate.
    CrateResponseBody => CrateResponse,
    /// Acknowledgement of a removal.
    RemovedResponseBody => RemovedResponse,
    /// Meaning of a provider status code.
    StatusDescriptorBody => StatusDescriptor,
}
