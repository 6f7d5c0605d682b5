//! Domain primitives, contracts and services.
//!
//! Purpose: hold everything the catalogue API knows independently of HTTP
//! or storage. Inbound and outbound adapters depend on this module, never
//! the reverse.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - TraceId (alias to `trace_id::TraceId`): per-request correlation id.
//! - `schema`: named data-shape contracts and the validator.
//! - `status`: provider response-code classification.
//! - `catalogue`: vocabularies and collection entities.
//! - `ports`: driving and driven port traits.
//! - CollectionService: the collection use-cases.

pub mod catalogue;
mod collection_service;
pub mod error;
pub mod ports;
pub mod schema;
pub mod status;
pub mod trace_id;

pub use self::collection_service::CollectionService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use cratedig::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such record"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
