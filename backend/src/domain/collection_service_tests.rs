//! Tests for the collection service.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::DefaultClock;
use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::catalogue::{Grading, ReleaseVersionSummary, VinylDetails};
use crate::domain::ports::{
    FixtureCollectionRepository, FixtureReleaseCatalogue, MockCollectionRepository,
    MockReleaseCatalogue,
};

type MockService = CollectionService<MockCollectionRepository, MockReleaseCatalogue>;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixed_clock() -> Arc<dyn Clock> {
    let now = Utc
        .with_ymd_and_hms(2024, 11, 5, 23, 59, 0)
        .single()
        .expect("valid instant");
    Arc::new(FixedClock(now))
}

fn make_service(repo: MockCollectionRepository, catalogue: MockReleaseCatalogue) -> MockService {
    CollectionService::new(Arc::new(repo), Arc::new(catalogue), fixed_clock())
}

fn summary(version_id: u64) -> ReleaseVersionSummary {
    ReleaseVersionSummary {
        version_id,
        release_id: 9000,
        title: "Stockholm".to_owned(),
    }
}

fn stored(key: VinylKey) -> VinylRecord {
    let added = NaiveDate::from_ymd_opt(2023, 6, 1).expect("valid date");
    VinylRecord::new(key, 9000, added)
}

fn add_request(details: VinylDetails) -> StoreVinylRequest {
    StoreVinylRequest {
        user_id: 7,
        version_id: 42,
        item: None,
        details,
    }
}

#[tokio::test]
async fn add_resolves_release_and_stores_next_item() {
    let mut catalogue = MockReleaseCatalogue::new();
    catalogue
        .expect_release_version()
        .with(eq(42))
        .times(1)
        .return_once(|id| Ok(summary(id)));
    let mut repo = MockCollectionRepository::new();
    repo.expect_add_vinyl()
        .times(1)
        .return_once(|record| Ok(record.with_item(3)));

    let record = make_service(repo, catalogue)
        .store_vinyl(add_request(VinylDetails {
            media_grade: Some(Some(Grading::Mint)),
            ..VinylDetails::default()
        }))
        .await
        .expect("add succeeds");

    assert_eq!(record.key(), VinylKey::new(7, 42, 3));
    assert_eq!(record.release_id(), 9000);
    assert_eq!(record.media_grade(), Some(Grading::Mint));
    assert_eq!(
        record.date_added(),
        NaiveDate::from_ymd_opt(2024, 11, 5).expect("valid date")
    );
}

#[tokio::test]
async fn update_keeps_existing_record_without_provider_lookup() {
    let key = VinylKey::new(7, 42, 2);
    let mut repo = MockCollectionRepository::new();
    repo.expect_find_vinyl()
        .with(eq(key))
        .times(1)
        .return_once(move |key| Ok(Some(stored(key))));
    repo.expect_upsert_vinyl().times(1).return_once(Ok);
    let mut catalogue = MockReleaseCatalogue::new();
    catalogue.expect_release_version().never();

    let record = make_service(repo, catalogue)
        .store_vinyl(StoreVinylRequest {
            item: Some(2),
            details: VinylDetails {
                notes: Some(Some("cleaned".to_owned())),
                ..VinylDetails::default()
            },
            ..add_request(VinylDetails::default())
        })
        .await
        .expect("update succeeds");

    assert_eq!(record.key(), key);
    assert_eq!(record.notes(), Some("cleaned"));
    assert_eq!(
        record.date_added(),
        NaiveDate::from_ymd_opt(2023, 6, 1).expect("valid date")
    );
}

#[tokio::test]
async fn add_reports_unknown_crate_as_not_found() {
    let mut catalogue = MockReleaseCatalogue::new();
    catalogue
        .expect_release_version()
        .return_once(|id| Ok(summary(id)));
    let mut repo = MockCollectionRepository::new();
    repo.expect_find_crate().never();
    repo.expect_add_vinyl()
        .withf(|record| record.crate_id() == Some("missing"))
        .times(1)
        .return_once(|_| Err(CollectionRepositoryError::unknown_crate(7_u64, "missing")));

    let err = make_service(repo, catalogue)
        .store_vinyl(add_request(VinylDetails {
            crate_id: Some(Some("missing".to_owned())),
            ..VinylDetails::default()
        }))
        .await
        .expect_err("crate does not exist");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "crate missing not found for user 7");
}

#[rstest]
#[case(CollectionRepositoryError::items_exhausted(7_u64, 42_u64))]
#[case(CollectionRepositoryError::item_occupied(7_u64, 42_u64, 3_u64))]
#[tokio::test]
async fn unavailable_items_are_conflicts(#[case] failure: CollectionRepositoryError) {
    let message = failure.to_string();
    let mut catalogue = MockReleaseCatalogue::new();
    catalogue
        .expect_release_version()
        .return_once(|id| Ok(summary(id)));
    let mut repo = MockCollectionRepository::new();
    repo.expect_add_vinyl().return_once(move |_| Err(failure));

    let err = make_service(repo, catalogue)
        .store_vinyl(add_request(VinylDetails::default()))
        .await
        .expect_err("no item available");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), message);
}

#[tokio::test]
async fn fetch_crate_returns_filed_records() {
    let mut repo = MockCollectionRepository::new();
    repo.expect_find_crate()
        .withf(|user_id, crate_id| *user_id == 7 && crate_id == "disco")
        .times(1)
        .return_once(|user_id, crate_id| {
            let request = NewCrate {
                name: "Disco".to_owned(),
                description: None,
            };
            Ok(Some(
                VinylCrate::new(crate_id, user_id, request)
                    .with_records(vec![VinylKey::new(7, 42, 1)]),
            ))
        });

    let found = make_service(repo, MockReleaseCatalogue::new())
        .fetch_crate(7, "disco".to_owned())
        .await
        .expect("crate exists");

    assert_eq!(found.records(), &[VinylKey::new(7, 42, 1)]);
}

#[tokio::test]
async fn fetch_missing_crate_is_not_found() {
    let mut repo = MockCollectionRepository::new();
    repo.expect_find_crate().return_once(|_, _| Ok(None));

    let err = make_service(repo, MockReleaseCatalogue::new())
        .fetch_crate(7, "disco".to_owned())
        .await
        .expect_err("no such crate");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "crate disco not found for user 7");
}

#[rstest]
#[case(ReleaseCatalogueError::not_found(42_u64), ErrorCode::NotFound)]
#[case(ReleaseCatalogueError::refused(401_u16, "Unauthorized"), ErrorCode::ServiceUnavailable)]
#[case(ReleaseCatalogueError::rejected(422_u16, "Unprocessable Entity"), ErrorCode::InternalError)]
#[case(ReleaseCatalogueError::upstream(500_u16), ErrorCode::UpstreamFailure)]
#[case(ReleaseCatalogueError::unrecognized(418_u16), ErrorCode::UpstreamFailure)]
#[case(ReleaseCatalogueError::transport("connection reset"), ErrorCode::ServiceUnavailable)]
#[case(ReleaseCatalogueError::timeout("10s elapsed"), ErrorCode::ServiceUnavailable)]
#[case(ReleaseCatalogueError::decode("expected value"), ErrorCode::UpstreamFailure)]
#[case(ReleaseCatalogueError::missing_body(204_u16), ErrorCode::UpstreamFailure)]
#[tokio::test]
async fn provider_failures_map_to_domain_codes(
    #[case] failure: ReleaseCatalogueError,
    #[case] expected: ErrorCode,
) {
    let mut catalogue = MockReleaseCatalogue::new();
    catalogue
        .expect_release_version()
        .times(1)
        .return_once(move |_| Err(failure));
    let mut repo = MockCollectionRepository::new();
    repo.expect_add_vinyl().never();

    let err = make_service(repo, catalogue)
        .store_vinyl(add_request(VinylDetails::default()))
        .await
        .expect_err("provider failure propagates");

    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn provider_errors_never_leak_transport_detail() {
    let mut catalogue = MockReleaseCatalogue::new();
    catalogue
        .expect_release_version()
        .return_once(|_| Err(ReleaseCatalogueError::transport("dns lookup for 10.0.0.3 failed")));

    let err = make_service(MockCollectionRepository::new(), catalogue)
        .store_vinyl(add_request(VinylDetails::default()))
        .await
        .expect_err("transport failure");

    assert!(!err.message().contains("10.0.0.3"));
}

#[tokio::test]
async fn unrecognized_status_details_carry_only_the_code() {
    let mut catalogue = MockReleaseCatalogue::new();
    catalogue
        .expect_release_version()
        .return_once(|_| Err(ReleaseCatalogueError::unrecognized(418_u16)));

    let err = make_service(MockCollectionRepository::new(), catalogue)
        .store_vinyl(add_request(VinylDetails::default()))
        .await
        .expect_err("unrecognized status");

    let details = err.details().expect("details present");
    assert_eq!(details["code"], "upstream_unrecognized");
    assert_eq!(details["upstreamStatus"], 418);
}

#[tokio::test]
async fn remove_missing_vinyl_is_not_found() {
    let mut repo = MockCollectionRepository::new();
    repo.expect_remove_vinyl().times(1).return_once(|_| Ok(false));

    let err = make_service(repo, MockReleaseCatalogue::new())
        .remove_vinyl(VinylKey::new(7, 42, 1))
        .await
        .expect_err("nothing to remove");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "user 7 holds no item 1 of version 42");
}

#[tokio::test]
async fn remove_crate_reports_absence() {
    let mut repo = MockCollectionRepository::new();
    repo.expect_remove_crate()
        .withf(|user_id, crate_id| *user_id == 7 && crate_id == "disco")
        .times(1)
        .return_once(|_, _| Ok(false));

    let err = make_service(repo, MockReleaseCatalogue::new())
        .remove_crate(7, "disco".to_owned())
        .await
        .expect_err("crate missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(CollectionRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(CollectionRepositoryError::query("bad row"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_map_to_domain_codes(
    #[case] failure: CollectionRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockCollectionRepository::new();
    repo.expect_find_vinyl()
        .times(1)
        .return_once(move |_| Err(failure));

    let err = make_service(repo, MockReleaseCatalogue::new())
        .fetch_vinyl(VinylKey::new(1, 2, 3))
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn fixtures_compose_into_a_working_service() {
    let service = CollectionService::new(
        Arc::new(FixtureCollectionRepository),
        Arc::new(FixtureReleaseCatalogue),
        Arc::new(DefaultClock),
    );

    let record = service
        .store_vinyl(add_request(VinylDetails::default()))
        .await
        .expect("fixture add succeeds");
    assert_eq!(record.release_id(), 42);

    let page = service
        .list_vinyl(7, PageRequest::default())
        .await
        .expect("fixture list succeeds");
    assert_eq!(page.total, 0);
}
