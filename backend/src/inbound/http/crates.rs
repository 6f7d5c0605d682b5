//! Crate endpoints.
//!
//! ```text
//! POST   /api/v1/users/{userID}/crates
//! GET    /api/v1/users/{userID}/crates/{crateID}
//! DELETE /api/v1/users/{userID}/crates/{crateID}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::catalogue::{NewCrate, VinylCrate};
use crate::domain::schema::SchemaName;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    CrateResponseBody, ErrorSchema, NewCrateBody, RemovedResponseBody,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{checked_payload, validate_body, validate_path};
use crate::inbound::http::vinyl::RemovedResponse;

#[derive(Debug, Deserialize)]
struct UserParams {
    #[serde(rename = "userID")]
    user_id: u64,
}

#[derive(Debug, Deserialize)]
struct CrateParams {
    #[serde(rename = "userID")]
    user_id: u64,
    #[serde(rename = "crateID")]
    crate_id: String,
}

#[derive(Debug, Serialize)]
struct CrateResponse<'a> {
    success: bool,
    #[serde(rename = "crate")]
    vinyl_crate: &'a VinylCrate,
}

/// Create an empty named crate.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userID}/crates",
    params(("userID" = u64, Path, description = "Owning user")),
    request_body(content = NewCrateBody, description = "Crate to create"),
    responses(
        (status = 201, description = "Created crate", body = CrateResponseBody),
        (status = 400, description = "Malformed body", body = ErrorSchema),
        (status = 422, description = "Invalid parameters or body", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["crates"],
    operation_id = "createCrate"
)]
#[post("/users/{userID}/crates")]
pub async fn create_crate(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let params: UserParams = validate_path(SchemaName::UserParams, &req)?;
    let request: NewCrate = validate_body(SchemaName::NewCrate, &body)?;
    let created = state.collection.create_crate(params.user_id, request).await?;
    let payload = checked_payload(
        SchemaName::CrateResponse,
        &CrateResponse {
            success: true,
            vinyl_crate: &created,
        },
    )?;
    Ok(HttpResponse::Created().json(payload))
}

/// Fetch a crate with the keys of the records filed in it.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userID}/crates/{crateID}",
    params(
        ("userID" = u64, Path, description = "Owning user"),
        ("crateID" = String, Path, description = "Crate identifier")
    ),
    responses(
        (status = 200, description = "Crate and its records", body = CrateResponseBody),
        (status = 404, description = "No such crate", body = ErrorSchema),
        (status = 422, description = "Invalid parameters", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["crates"],
    operation_id = "getCrate"
)]
#[get("/users/{userID}/crates/{crateID}")]
pub async fn get_crate(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let params: CrateParams = validate_path(SchemaName::CrateParams, &req)?;
    let found = state
        .collection_query
        .fetch_crate(params.user_id, params.crate_id)
        .await?;
    let payload = checked_payload(
        SchemaName::CrateResponse,
        &CrateResponse {
            success: true,
            vinyl_crate: &found,
        },
    )?;
    Ok(HttpResponse::Ok().json(payload))
}

/// Remove a crate. Records filed in it stay in the collection, unfiled.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{userID}/crates/{crateID}",
    params(
        ("userID" = u64, Path, description = "Owning user"),
        ("crateID" = String, Path, description = "Crate identifier")
    ),
    responses(
        (status = 200, description = "Crate removed", body = RemovedResponseBody),
        (status = 404, description = "No such crate", body = ErrorSchema),
        (status = 422, description = "Invalid parameters", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["crates"],
    operation_id = "removeCrate"
)]
#[delete("/users/{userID}/crates/{crateID}")]
pub async fn remove_crate(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let params: CrateParams = validate_path(SchemaName::CrateParams, &req)?;
    state
        .collection
        .remove_crate(params.user_id, params.crate_id)
        .await?;
    let payload = checked_payload(SchemaName::RemovedResponse, &RemovedResponse::DONE)?;
    Ok(HttpResponse::Ok().json(payload))
}

#[cfg(test)]
mod tests {
    //! Handler coverage for crate routes.

    use std::sync::Arc;

    use super::*;
    use crate::domain::Error;
    use crate::domain::catalogue::{NewCrate, VinylKey};
    use crate::domain::ports::{
        FixtureCollectionCommand, FixtureCollectionQuery, MockCollectionCommand,
        MockCollectionQuery,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    fn state(command: MockCollectionCommand) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(command),
            Arc::new(FixtureCollectionQuery),
        ))
    }

    async fn call(state: web::Data<HttpState>, req: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new().app_data(state).service(
                web::scope("/api/v1")
                    .service(create_crate)
                    .service(get_crate)
                    .service(remove_crate),
            ),
        )
        .await;
        let res = actix_test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = actix_test::read_body(res).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[actix_web::test]
    async fn create_returns_created_crate() {
        let mut command = MockCollectionCommand::new();
        command
            .expect_create_crate()
            .withf(|user_id, request| *user_id == 7 && request.name == "Disco")
            .times(1)
            .return_once(|user_id, request| Ok(VinylCrate::new("c-1", user_id, request)));

        let (status, body) = call(
            state(command),
            actix_test::TestRequest::post()
                .uri("/api/v1/users/7/crates")
                .set_json(json!({ "name": "Disco", "description": "Friday sets" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["crate"]["crateID"], "c-1");
        assert_eq!(body["crate"]["userID"], 7);
        assert_eq!(body["crate"]["records"], json!([]));
    }

    #[actix_web::test]
    async fn create_requires_a_name() {
        let mut command = MockCollectionCommand::new();
        command.expect_create_crate().never();

        let (status, body) = call(
            state(command),
            actix_test::TestRequest::post()
                .uri("/api/v1/users/7/crates")
                .set_json(json!({ "name": "  " })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["violations"][0]["field"], "name");
        assert_eq!(body["details"]["violations"][0]["code"], "empty_string");
    }

    #[actix_web::test]
    async fn remove_passes_the_crate_identifier() {
        let mut command = MockCollectionCommand::new();
        command
            .expect_remove_crate()
            .with(eq(7_u64), eq("c-1".to_owned()))
            .times(1)
            .return_once(|_, _| Ok(()));

        let (status, body) = call(
            state(command),
            actix_test::TestRequest::delete().uri("/api/v1/users/7/crates/c-1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
    }

    #[actix_web::test]
    async fn remove_missing_crate_is_not_found() {
        let mut command = MockCollectionCommand::new();
        command
            .expect_remove_crate()
            .return_once(|_, _| Err(Error::not_found("crate c-9 not found for user 7")));

        let (status, body) = call(
            state(command),
            actix_test::TestRequest::delete().uri("/api/v1/users/7/crates/c-9"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }

    #[actix_web::test]
    async fn get_lists_filed_record_keys() {
        let mut query = MockCollectionQuery::new();
        query
            .expect_fetch_crate()
            .with(eq(7_u64), eq("c-1".to_owned()))
            .times(1)
            .return_once(|user_id, crate_id| {
                let request = NewCrate {
                    name: "Disco".to_owned(),
                    description: None,
                };
                Ok(VinylCrate::new(crate_id, user_id, request)
                    .with_records(vec![VinylKey::new(7, 42, 1), VinylKey::new(7, 42, 2)]))
            });
        let state = web::Data::new(HttpState::new(
            Arc::new(FixtureCollectionCommand),
            Arc::new(query),
        ));

        let (status, body) = call(
            state,
            actix_test::TestRequest::get().uri("/api/v1/users/7/crates/c-1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["crate"]["name"], "Disco");
        assert_eq!(
            body["crate"]["records"],
            json!([
                { "userID": 7, "versionID": 42, "item": 1 },
                { "userID": 7, "versionID": 42, "item": 2 }
            ])
        );
    }

    #[actix_web::test]
    async fn get_missing_crate_is_not_found() {
        let (status, body) = call(
            web::Data::new(HttpState::default()),
            actix_test::TestRequest::get().uri("/api/v1/users/7/crates/c-9"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "crate c-9 not found for user 7");
    }

    #[actix_web::test]
    async fn non_numeric_user_is_rejected_before_the_port() {
        let mut command = MockCollectionCommand::new();
        command.expect_remove_crate().never();

        let (status, body) = call(
            state(command),
            actix_test::TestRequest::delete().uri("/api/v1/users/abc/crates/c-1"),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["schema"], "CrateParams");
    }
}
