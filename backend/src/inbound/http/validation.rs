//! Registry-backed validation for inbound HTTP requests and outgoing payloads.
//!
//! Route parameters and query strings arrive as text; they are gathered into
//! a JSON object and checked against a registry entry, which coerces numeric
//! strings. Only the coerced value is decoded into the handler's typed
//! parameters. Response payloads pass through [`checked_payload`] so a
//! handler can never return a shape its schema does not describe.

use actix_web::HttpRequest;
use actix_web::web::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::error;

use crate::domain::Error;
use crate::domain::schema::{self, SchemaName, ValidationErrors};

/// Convert registry violations into a `validation_failed` error listing every
/// offending field.
pub(crate) fn validation_error(errors: ValidationErrors) -> Error {
    Error::validation_failed(errors.to_string()).with_details(json!({
        "schema": errors.schema().as_str(),
        "violations": errors.violations(),
    }))
}

fn decode_validated<T: DeserializeOwned>(name: SchemaName, value: Value) -> Result<T, Error> {
    serde_json::from_value(value)
        .map_err(|err| Error::internal(format!("validated {name} value did not decode: {err}")))
}

fn text_object(pairs: impl IntoIterator<Item = (String, String)>) -> Value {
    Value::Object(
        pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect::<Map<String, Value>>(),
    )
}

/// Validate the matched route segments against `name` and decode them.
pub(crate) fn validate_path<T: DeserializeOwned>(
    name: SchemaName,
    req: &HttpRequest,
) -> Result<T, Error> {
    let raw = text_object(
        req.match_info()
            .iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned())),
    );
    let validated = schema::validate(name, &raw).map_err(validation_error)?;
    decode_validated(name, validated)
}

/// Validate the query string against `name` and decode it. A repeated key
/// keeps its last value.
pub(crate) fn validate_query<T: DeserializeOwned>(
    name: SchemaName,
    req: &HttpRequest,
) -> Result<T, Error> {
    let raw = text_object(
        url::form_urlencoded::parse(req.query_string().as_bytes()).into_owned(),
    );
    let validated = schema::validate(name, &raw).map_err(validation_error)?;
    decode_validated(name, validated)
}

/// Parse a JSON body, validate it against `name` and decode it. An empty body
/// stands for an empty object.
pub(crate) fn validate_body<T: DeserializeOwned>(
    name: SchemaName,
    body: &Bytes,
) -> Result<T, Error> {
    let raw = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(body).map_err(|err| {
            Error::invalid_request("request body is not valid JSON")
                .with_details(json!({ "schema": name.as_str(), "reason": err.to_string() }))
        })?
    };
    let validated = schema::validate(name, &raw).map_err(validation_error)?;
    decode_validated(name, validated)
}

/// Serialise `payload` and validate it against `name`, returning the value to
/// send.
///
/// A payload that breaks its own schema is a server fault and surfaces as an
/// internal error.
pub(crate) fn checked_payload(name: SchemaName, payload: &impl Serialize) -> Result<Value, Error> {
    let value = serde_json::to_value(payload)
        .map_err(|err| Error::internal(format!("{name} payload did not serialise: {err}")))?;
    let validated = schema::validate(name, &value).map_err(|errors| {
        error!(schema = name.as_str(), violations = ?errors.violations(), "response failed validation");
        Error::internal(format!("{name} response failed validation"))
    })?;
    Ok(validated)
}
