//! End-to-end coverage of the collection routes over the in-memory store.

use std::collections::HashSet;
use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use cratedig::Trace;
use cratedig::TraceId;
use cratedig::domain::catalogue::ReleaseVersionSummary;
use cratedig::domain::ports::{ReleaseCatalogue, ReleaseCatalogueError};
use cratedig::domain::{CollectionService, TRACE_ID_HEADER};
use cratedig::inbound::http::crates::{create_crate, get_crate, remove_crate};
use cratedig::inbound::http::state::HttpState;
use cratedig::inbound::http::status::describe_status;
use cratedig::inbound::http::vinyl::{add_vinyl, get_vinyl, list_vinyl, put_vinyl, remove_vinyl};
use cratedig::outbound::persistence::InMemoryCollectionRepository;

/// Provider stand-in that knows every version except the listed ones.
#[derive(Default)]
struct StubCatalogue {
    missing: HashSet<u64>,
}

#[async_trait]
impl ReleaseCatalogue for StubCatalogue {
    async fn release_version(
        &self,
        version_id: u64,
    ) -> Result<ReleaseVersionSummary, ReleaseCatalogueError> {
        if self.missing.contains(&version_id) {
            return Err(ReleaseCatalogueError::not_found(version_id));
        }
        Ok(ReleaseVersionSummary {
            version_id,
            release_id: version_id + 10_000,
            title: format!("Version {version_id}"),
        })
    }
}

#[fixture]
fn state() -> web::Data<HttpState> {
    let catalogue = StubCatalogue {
        missing: HashSet::from([404]),
    };
    let service = Arc::new(CollectionService::new(
        Arc::new(InMemoryCollectionRepository::new()),
        Arc::new(catalogue),
        Arc::new(DefaultClock),
    ));
    web::Data::new(HttpState::new(service.clone(), service))
}

async fn app(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new().app_data(state).wrap(Trace).service(
            web::scope("/api/v1")
                .service(list_vinyl)
                .service(add_vinyl)
                .service(put_vinyl)
                .service(get_vinyl)
                .service(remove_vinyl)
                .service(create_crate)
                .service(get_crate)
                .service(remove_crate)
                .service(describe_status),
        ),
    )
    .await
}

async fn send(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    req: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let res = actix_test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[rstest]
#[actix_web::test]
async fn add_list_and_remove_round_trip(state: web::Data<HttpState>) {
    let app = app(state).await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            actix_test::TestRequest::put().uri("/api/v1/users/7/vinyl/42"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, listed) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users/7/vinyl"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items: Vec<_> = listed["records"]
        .as_array()
        .expect("records")
        .iter()
        .map(|record| record["item"].clone())
        .collect();
    assert_eq!(items, vec![json!(1), json!(2)]);
    assert_eq!(listed["records"][0]["releaseID"], 10_042);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::delete().uri("/api/v1/users/7/vinyl/42/1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users/7/vinyl/42/1"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn unknown_release_version_is_not_found(state: web::Data<HttpState>) {
    let app = app(state).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put().uri("/api/v1/users/7/vinyl/404"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "release version 404 not found");

    let (_, listed) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users/7/vinyl"),
    )
    .await;
    assert_eq!(listed["pagination"]["items"], 0);
}

#[rstest]
#[actix_web::test]
async fn update_overlays_details_without_provider_lookup(state: web::Data<HttpState>) {
    let app = app(state).await;
    send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/7/vinyl/42")
            .set_json(json!({ "notes": "first pressing", "media_grade": "VG" })),
    )
    .await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/7/vinyl/42/1")
            .set_json(json!({ "media_grade": "NM" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vinyl"]["media_grade"], "NM");
    assert_eq!(body["vinyl"]["notes"], "first pressing");
}

#[rstest]
#[actix_web::test]
async fn validation_failures_name_schema_and_fields(state: web::Data<HttpState>) {
    let app = app(state).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/7/vinyl/42")
            .set_json(json!({ "sleeve_grade": "Mint-ish", "tags": "jazz" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation_failed");
    assert_eq!(body["details"]["schema"], "VinylDetails");
    let fields: Vec<_> = body["details"]["violations"]
        .as_array()
        .expect("violations")
        .iter()
        .map(|violation| violation["field"].clone())
        .collect();
    assert_eq!(fields, vec![json!("sleeve_grade"), json!("tags")]);
}

#[rstest]
#[actix_web::test]
async fn removing_a_crate_unfiles_its_records(state: web::Data<HttpState>) {
    let app = app(state).await;

    let (status, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/7/crates")
            .set_json(json!({ "name": "Sunday jazz" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let crate_id = created["crate"]["crateID"]
        .as_str()
        .expect("crate id")
        .to_owned();

    let (status, filed) = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/7/vinyl/42")
            .set_json(json!({ "crateID": crate_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filed["vinyl"]["crateID"], crate_id.as_str());

    let (status, listed) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/7/crates/{crate_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listed["crate"]["records"],
        json!([{ "userID": 7, "versionID": 42, "item": 1 }])
    );

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/users/7/crates/{crate_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, fetched) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users/7/vinyl/42/1"),
    )
    .await;
    assert!(fetched["vinyl"].get("crateID").is_none());

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/users/7/crates/{crate_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/7/crates/{crate_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn adding_past_the_last_item_is_a_conflict(state: web::Data<HttpState>) {
    let app = app(state).await;
    let last = format!("/api/v1/users/7/vinyl/42/{}", u64::MAX);

    let (status, _) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&last)
            .set_json(json!({ "notes": "keep me" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put().uri("/api/v1/users/7/vinyl/42"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let (_, kept) = send(&app, actix_test::TestRequest::get().uri(&last)).await;
    assert_eq!(kept["vinyl"]["notes"], "keep me");
}

#[rstest]
#[actix_web::test]
async fn null_details_clear_stored_values(state: web::Data<HttpState>) {
    let app = app(state).await;
    send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/7/vinyl/42")
            .set_json(json!({ "notes": "promo copy", "media_grade": "VG" })),
    )
    .await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/7/vinyl/42/1")
            .set_json(json!({ "notes": null, "date_sold": "2025-02-14" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["vinyl"].get("notes").is_none());
    assert_eq!(body["vinyl"]["media_grade"], "VG");
    assert_eq!(body["vinyl"]["date_sold"], "2025-02-14");
}

#[rstest]
#[actix_web::test]
async fn filing_into_an_unknown_crate_is_not_found(state: web::Data<HttpState>) {
    let app = app(state).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/7/vinyl/42")
            .set_json(json!({ "crateID": "missing" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "crate missing not found for user 7");
}

#[rstest]
#[case("404", StatusCode::OK, "Not Found")]
#[case("201", StatusCode::OK, "Created")]
#[case("418", StatusCode::NOT_FOUND, "")]
#[actix_web::test]
async fn status_route_describes_provider_codes(
    state: web::Data<HttpState>,
    #[case] code: &str,
    #[case] expected: StatusCode,
    #[case] name: &str,
) {
    let app = app(state).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/status/{code}")),
    )
    .await;

    assert_eq!(status, expected);
    if expected == StatusCode::OK {
        assert_eq!(body["name"], name);
    }
}

#[rstest]
#[actix_web::test]
async fn error_bodies_carry_the_response_trace_id(state: web::Data<HttpState>) {
    let app = app(state).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/7/vinyl/42/9")
            .to_request(),
    )
    .await;
    let header: TraceId = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .expect("trace id header");
    let body: Value = actix_test::read_body_json(res).await;

    assert_eq!(body["traceId"], header.to_string());
}
