//! Collection domain service.
//!
//! Implements the collection driving ports over the collection store and the
//! provider catalogue. Provider lookups happen only when a new record needs
//! its release resolved.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;
use crate::domain::catalogue::{NewCrate, VinylCrate, VinylKey, VinylRecord};
use crate::domain::ports::{
    CollectionCommand, CollectionQuery, CollectionRepository, CollectionRepositoryError,
    ReleaseCatalogue, ReleaseCatalogueError, StoreVinylRequest, VinylPage,
};

fn map_repository_error(error: CollectionRepositoryError) -> Error {
    debug!(kind = error.kind(), %error, "collection store call failed");
    match error {
        CollectionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("collection store unavailable: {message}"))
        }
        CollectionRepositoryError::Query { message } => {
            Error::internal(format!("collection store error: {message}"))
        }
        CollectionRepositoryError::UnknownCrate { user_id, crate_id } => {
            crate_not_found(user_id, &crate_id)
        }
        occupied @ (CollectionRepositoryError::ItemsExhausted { .. }
        | CollectionRepositoryError::ItemOccupied { .. }) => Error::conflict(occupied.to_string()),
    }
}

fn map_catalogue_error(error: ReleaseCatalogueError) -> Error {
    debug!(kind = error.kind(), %error, "provider lookup failed");
    match error {
        ReleaseCatalogueError::NotFound { version_id } => {
            Error::not_found(format!("release version {version_id} not found"))
        }
        ReleaseCatalogueError::Refused { status, name } => {
            Error::service_unavailable("music metadata provider refused the request")
                .with_details(json!({ "upstreamStatus": status, "upstreamName": name }))
        }
        ReleaseCatalogueError::Rejected { status, name } => {
            Error::internal(format!("provider rejected the lookup: {status} {name}"))
        }
        ReleaseCatalogueError::Upstream { status } => {
            Error::upstream_failure("music metadata provider failed")
                .with_details(json!({ "upstreamStatus": status }))
        }
        ReleaseCatalogueError::Unrecognized { status } => Error::upstream_failure(format!(
            "music metadata provider answered with unrecognized status {status}"
        ))
        .with_details(json!({ "code": "upstream_unrecognized", "upstreamStatus": status })),
        ReleaseCatalogueError::Transport { .. } => {
            Error::service_unavailable("music metadata provider is unreachable")
        }
        ReleaseCatalogueError::Timeout { .. } => {
            Error::service_unavailable("music metadata provider timed out")
        }
        ReleaseCatalogueError::Decode { .. } => {
            Error::upstream_failure("music metadata provider sent an unreadable response")
        }
        ReleaseCatalogueError::MissingBody { status } => {
            Error::upstream_failure("music metadata provider sent no release data")
                .with_details(json!({ "upstreamStatus": status }))
        }
    }
}

fn vinyl_not_found(key: VinylKey) -> Error {
    Error::not_found(format!(
        "user {} holds no item {} of version {}",
        key.user_id, key.item, key.version_id
    ))
}

fn crate_not_found(user_id: u64, crate_id: &str) -> Error {
    Error::not_found(format!("crate {crate_id} not found for user {user_id}"))
}

/// Collection service implementing the command and query driving ports.
#[derive(Clone)]
pub struct CollectionService<R, C> {
    collection_repo: Arc<R>,
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R, C> CollectionService<R, C> {
    /// Create a new service over a collection store and provider catalogue.
    ///
    /// `clock` stamps the `date_added` of newly created records.
    pub fn new(collection_repo: Arc<R>, catalogue: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection_repo,
            catalogue,
            clock,
        }
    }
}

impl<R, C> CollectionService<R, C>
where
    R: CollectionRepository,
    C: ReleaseCatalogue,
{
    async fn new_record(&self, key: VinylKey) -> Result<VinylRecord, Error> {
        let version = self
            .catalogue
            .release_version(key.version_id)
            .await
            .map_err(map_catalogue_error)?;
        Ok(VinylRecord::new(
            key,
            version.release_id,
            self.clock.utc().date_naive(),
        ))
    }
}

#[async_trait]
impl<R, C> CollectionCommand for CollectionService<R, C>
where
    R: CollectionRepository,
    C: ReleaseCatalogue,
{
    async fn store_vinyl(&self, request: StoreVinylRequest) -> Result<VinylRecord, Error> {
        let StoreVinylRequest {
            user_id,
            version_id,
            item,
            details,
        } = request;

        match item {
            None => {
                let record = self
                    .new_record(VinylKey::new(user_id, version_id, 1))
                    .await?
                    .with_details(details);
                self.collection_repo
                    .add_vinyl(record)
                    .await
                    .map_err(map_repository_error)
            }
            Some(item) => {
                let key = VinylKey::new(user_id, version_id, item);
                let existing = self
                    .collection_repo
                    .find_vinyl(key)
                    .await
                    .map_err(map_repository_error)?;
                let base = match existing {
                    Some(record) => record,
                    None => self.new_record(key).await?,
                };
                self.collection_repo
                    .upsert_vinyl(base.with_details(details))
                    .await
                    .map_err(map_repository_error)
            }
        }
    }

    async fn remove_vinyl(&self, key: VinylKey) -> Result<(), Error> {
        let removed = self
            .collection_repo
            .remove_vinyl(key)
            .await
            .map_err(map_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(vinyl_not_found(key))
        }
    }

    async fn create_crate(&self, user_id: u64, request: NewCrate) -> Result<VinylCrate, Error> {
        self.collection_repo
            .create_crate(user_id, request)
            .await
            .map_err(map_repository_error)
    }

    async fn remove_crate(&self, user_id: u64, crate_id: String) -> Result<(), Error> {
        let removed = self
            .collection_repo
            .remove_crate(user_id, &crate_id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(crate_not_found(user_id, &crate_id))
        }
    }
}

#[async_trait]
impl<R, C> CollectionQuery for CollectionService<R, C>
where
    R: CollectionRepository,
    C: ReleaseCatalogue,
{
    async fn fetch_vinyl(&self, key: VinylKey) -> Result<VinylRecord, Error> {
        self.collection_repo
            .find_vinyl(key)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| vinyl_not_found(key))
    }

    async fn list_vinyl(&self, user_id: u64, page: PageRequest) -> Result<VinylPage, Error> {
        self.collection_repo
            .list_vinyl(user_id, page)
            .await
            .map_err(map_repository_error)
    }

    async fn fetch_crate(&self, user_id: u64, crate_id: String) -> Result<VinylCrate, Error> {
        self.collection_repo
            .find_crate(user_id, &crate_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| crate_not_found(user_id, &crate_id))
    }
}

#[cfg(test)]
#[path = "collection_service_tests.rs"]
mod tests;
