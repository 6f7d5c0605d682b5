//! Provider status lookup endpoint.
//!
//! ```text
//! GET /api/v1/status/{code}
//! ```

use actix_web::{HttpRequest, HttpResponse, get};
use serde::Deserialize;
use serde_json::json;

use crate::domain::Error;
use crate::domain::schema::SchemaName;
use crate::domain::status::{UNRECOGNIZED_STATUS, classify};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, StatusDescriptorBody};
use crate::inbound::http::validation::{checked_payload, validate_path};

#[derive(Debug, Deserialize)]
struct StatusParams {
    code: i64,
}

/// Describe a music metadata provider response code.
#[utoipa::path(
    get,
    path = "/api/v1/status/{code}",
    params(("code" = i64, Path, description = "Provider response code")),
    responses(
        (status = 200, description = "Recognised code", body = StatusDescriptorBody),
        (status = 404, description = "Unrecognised code", body = ErrorSchema),
        (status = 422, description = "Code is not an integer", body = ErrorSchema)
    ),
    tags = ["status"],
    operation_id = "describeStatus"
)]
#[get("/status/{code}")]
pub async fn describe_status(req: HttpRequest) -> ApiResult<HttpResponse> {
    let params: StatusParams = validate_path(SchemaName::StatusParams, &req)?;
    let descriptor = classify(params.code).ok_or_else(|| {
        Error::not_found(format!("{UNRECOGNIZED_STATUS} {}", params.code))
            .with_details(json!({ "code": params.code, "name": UNRECOGNIZED_STATUS }))
    })?;
    let payload = checked_payload(SchemaName::StatusDescriptor, descriptor)?;
    Ok(HttpResponse::Ok().json(payload))
}
