//! Vinyl record endpoints.
//!
//! ```text
//! PUT    /api/v1/users/{userID}/vinyl/{versionID}
//! PUT    /api/v1/users/{userID}/vinyl/{versionID}/{item}
//! GET    /api/v1/users/{userID}/vinyl/{versionID}/{item}
//! DELETE /api/v1/users/{userID}/vinyl/{versionID}/{item}
//! GET    /api/v1/users/{userID}/vinyl?page=&per_page=
//! ```

use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{HttpRequest, HttpResponse, delete, get, put, web};
use pagination::{PageRequest, PageRequestError, Pagination};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Error;
use crate::domain::catalogue::{VinylDetails, VinylKey, VinylRecord};
use crate::domain::ports::StoreVinylRequest;
use crate::domain::schema::SchemaName;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    AddVinylResponseBody, CrateListResponseBody, ErrorSchema, RemovedResponseBody,
    VinylDetailsBody,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    checked_payload, validate_body, validate_path, validate_query,
};

#[derive(Debug, Deserialize)]
struct VinylParams {
    #[serde(rename = "userID")]
    user_id: u64,
    #[serde(rename = "versionID")]
    version_id: u64,
    #[serde(default)]
    item: Option<u64>,
}

impl VinylParams {
    fn key(&self) -> Result<VinylKey, Error> {
        self.item
            .map(|item| VinylKey::new(self.user_id, self.version_id, item))
            .ok_or_else(|| Error::internal("vinyl route matched without an item segment"))
    }
}

#[derive(Debug, Deserialize)]
struct UserParams {
    #[serde(rename = "userID")]
    user_id: u64,
}

#[derive(Debug, Deserialize)]
struct PageParams {
    #[serde(default)]
    page: Option<u64>,
    #[serde(default)]
    per_page: Option<u64>,
}

impl PageParams {
    fn into_request(self) -> Result<PageRequest, Error> {
        let narrow = |value: Option<u64>| value.map(|v| u32::try_from(v).unwrap_or(u32::MAX));
        PageRequest::from_query(narrow(self.page), narrow(self.per_page)).map_err(page_error)
    }
}

fn page_error(error: PageRequestError) -> Error {
    let field = match error {
        PageRequestError::ZeroPage => "page",
        PageRequestError::PerPageOutOfRange { .. } => "per_page",
    };
    Error::validation_failed(error.to_string()).with_details(json!({
        "schema": SchemaName::PageParams.as_str(),
        "violations": [{ "field": field, "code": "out_of_range", "message": error.to_string() }],
    }))
}

#[derive(Debug, Serialize)]
struct VinylResponse<'a> {
    success: bool,
    vinyl: &'a VinylRecord,
}

#[derive(Debug, Serialize)]
struct CrateListResponse<'a> {
    success: bool,
    records: &'a [VinylRecord],
    pagination: Pagination,
}

/// Acknowledgement returned by removal routes.
#[derive(Debug, Serialize)]
pub(crate) struct RemovedResponse {
    success: bool,
}

impl RemovedResponse {
    pub(crate) const DONE: Self = Self { success: true };
}

/// Collection reads are per-user and change on every write, so caches must
/// revalidate before reuse.
fn uncached(payload: serde_json::Value) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(CacheControl(vec![
            CacheDirective::Private,
            CacheDirective::NoCache,
            CacheDirective::MustRevalidate,
        ]))
        .json(payload)
}

fn vinyl_payload(record: &VinylRecord) -> Result<serde_json::Value, Error> {
    checked_payload(
        SchemaName::AddVinylResponse,
        &VinylResponse {
            success: true,
            vinyl: record,
        },
    )
}

async fn store(
    state: &HttpState,
    params: VinylParams,
    details: VinylDetails,
) -> ApiResult<HttpResponse> {
    let record = state
        .collection
        .store_vinyl(StoreVinylRequest {
            user_id: params.user_id,
            version_id: params.version_id,
            item: params.item,
            details,
        })
        .await?;
    Ok(HttpResponse::Ok().json(vinyl_payload(&record)?))
}

/// Add a copy of a release version to a user's collection.
#[utoipa::path(
    put,
    path = "/api/v1/users/{userID}/vinyl/{versionID}",
    description = "Resolve the release version through the music metadata provider and store it under the next free item index.",
    params(
        ("userID" = u64, Path, description = "Owning user"),
        ("versionID" = u64, Path, description = "Release version to add")
    ),
    request_body(content = VinylDetailsBody, description = "Optional details stored with the record"),
    responses(
        (status = 200, description = "Stored record", body = AddVinylResponseBody),
        (status = 400, description = "Malformed body", body = ErrorSchema),
        (status = 404, description = "Unknown release version or crate", body = ErrorSchema),
        (status = 422, description = "Invalid parameters or body", body = ErrorSchema),
        (status = 502, description = "Provider failure", body = ErrorSchema),
        (status = 503, description = "Provider or store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["vinyl"],
    operation_id = "addVinyl"
)]
#[put("/users/{userID}/vinyl/{versionID}")]
pub async fn add_vinyl(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let params: VinylParams = validate_path(SchemaName::VinylParams, &req)?;
    let details = validate_body(SchemaName::VinylDetails, &body)?;
    store(&state, params, details).await
}

/// Insert or update one item of a user's collection.
#[utoipa::path(
    put,
    path = "/api/v1/users/{userID}/vinyl/{versionID}/{item}",
    description = "Overlay the supplied details on an existing item, or create the item when absent.",
    params(
        ("userID" = u64, Path, description = "Owning user"),
        ("versionID" = u64, Path, description = "Release version"),
        ("item" = u64, Path, description = "Copy index")
    ),
    request_body(content = VinylDetailsBody, description = "Optional details stored with the record"),
    responses(
        (status = 200, description = "Stored record", body = AddVinylResponseBody),
        (status = 400, description = "Malformed body", body = ErrorSchema),
        (status = 404, description = "Unknown release version or crate", body = ErrorSchema),
        (status = 422, description = "Invalid parameters or body", body = ErrorSchema),
        (status = 502, description = "Provider failure", body = ErrorSchema),
        (status = 503, description = "Provider or store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["vinyl"],
    operation_id = "putVinyl"
)]
#[put("/users/{userID}/vinyl/{versionID}/{item}")]
pub async fn put_vinyl(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let params: VinylParams = validate_path(SchemaName::VinylParams, &req)?;
    let details = validate_body(SchemaName::VinylDetails, &body)?;
    store(&state, params, details).await
}

/// Fetch one item of a user's collection.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userID}/vinyl/{versionID}/{item}",
    params(
        ("userID" = u64, Path, description = "Owning user"),
        ("versionID" = u64, Path, description = "Release version"),
        ("item" = u64, Path, description = "Copy index")
    ),
    responses(
        (
            status = 200,
            description = "Stored record",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = AddVinylResponseBody
        ),
        (status = 404, description = "No such item", body = ErrorSchema),
        (status = 422, description = "Invalid parameters", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["vinyl"],
    operation_id = "getVinyl"
)]
#[get("/users/{userID}/vinyl/{versionID}/{item}")]
pub async fn get_vinyl(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let params: VinylParams = validate_path(SchemaName::VinylParams, &req)?;
    let record = state.collection_query.fetch_vinyl(params.key()?).await?;
    Ok(uncached(vinyl_payload(&record)?))
}

/// Remove one item from a user's collection.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{userID}/vinyl/{versionID}/{item}",
    params(
        ("userID" = u64, Path, description = "Owning user"),
        ("versionID" = u64, Path, description = "Release version"),
        ("item" = u64, Path, description = "Copy index")
    ),
    responses(
        (status = 200, description = "Item removed", body = RemovedResponseBody),
        (status = 404, description = "No such item", body = ErrorSchema),
        (status = 422, description = "Invalid parameters", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["vinyl"],
    operation_id = "removeVinyl"
)]
#[delete("/users/{userID}/vinyl/{versionID}/{item}")]
pub async fn remove_vinyl(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let params: VinylParams = validate_path(SchemaName::VinylParams, &req)?;
    state.collection.remove_vinyl(params.key()?).await?;
    let payload = checked_payload(SchemaName::RemovedResponse, &RemovedResponse::DONE)?;
    Ok(HttpResponse::Ok().json(payload))
}

/// Page through a user's collection.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userID}/vinyl",
    params(
        ("userID" = u64, Path, description = "Owning user"),
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (
            status = 200,
            description = "One page of records",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = CrateListResponseBody
        ),
        (status = 422, description = "Invalid parameters", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["vinyl"],
    operation_id = "listVinyl"
)]
#[get("/users/{userID}/vinyl")]
pub async fn list_vinyl(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let params: UserParams = validate_path(SchemaName::UserParams, &req)?;
    let page = validate_query::<PageParams>(SchemaName::PageParams, &req)?.into_request()?;
    let listed = state
        .collection_query
        .list_vinyl(params.user_id, page)
        .await?;
    let pagination = Pagination::for_items(page, listed.total, &req.full_url());
    let payload = checked_payload(
        SchemaName::CrateListResponse,
        &CrateListResponse {
            success: true,
            records: &listed.records,
            pagination,
        },
    )?;
    Ok(uncached(payload))
}

#[cfg(test)]
#[path = "vinyl_tests.rs"]
mod tests;
