//! Driven port for the collection store.
//!
//! The hosting environment supplies the actual table binding; the domain only
//! sees this trait. Records are keyed by [`VinylKey`] and crates by their
//! owning user plus crate identifier.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::catalogue::{NewCrate, VinylCrate, VinylKey, VinylRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by collection store adapters.
    pub enum CollectionRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "collection store connection failed: {message}",
        /// A read or write failed while executing.
        Query { message: String } =>
            "collection store query failed: {message}",
        /// Every item index for the version is already taken.
        ItemsExhausted { user_id: u64, version_id: u64 } =>
            "user {user_id} has no free item index for version {version_id}",
        /// A new record would land on an item that is already held.
        ItemOccupied { user_id: u64, version_id: u64, item: u64 } =>
            "user {user_id} already holds item {item} of version {version_id}",
        /// The record names a crate the user does not own.
        UnknownCrate { user_id: u64, crate_id: String } =>
            "crate {crate_id} not found for user {user_id}",
    }
}

/// One page of a user's records plus the size of the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VinylPage {
    /// Records on the requested page, ordered by key.
    pub records: Vec<VinylRecord>,
    /// Number of records the user holds in total.
    pub total: u64,
}

/// Port for reading and writing a user's collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Store `record` as the next free item for its user and version.
    ///
    /// The item index in `record`'s key is replaced by the index assigned.
    /// Fails with [`CollectionRepositoryError::UnknownCrate`] when the record
    /// is filed in a crate the user does not own, checked in the same write.
    async fn add_vinyl(&self, record: VinylRecord) -> Result<VinylRecord, CollectionRepositoryError>;

    /// Insert or replace the record at its key, with the same crate check as
    /// [`CollectionRepository::add_vinyl`].
    async fn upsert_vinyl(
        &self,
        record: VinylRecord,
    ) -> Result<VinylRecord, CollectionRepositoryError>;

    /// Fetch the record at `key`.
    async fn find_vinyl(&self, key: VinylKey)
    -> Result<Option<VinylRecord>, CollectionRepositoryError>;

    /// Remove the record at `key`, reporting whether one existed.
    async fn remove_vinyl(&self, key: VinylKey) -> Result<bool, CollectionRepositoryError>;

    /// Page through the records owned by `user_id`.
    async fn list_vinyl(
        &self,
        user_id: u64,
        page: PageRequest,
    ) -> Result<VinylPage, CollectionRepositoryError>;

    /// Create an empty crate for `user_id`.
    async fn create_crate(
        &self,
        user_id: u64,
        request: NewCrate,
    ) -> Result<VinylCrate, CollectionRepositoryError>;

    /// Fetch a crate with the keys of the records filed in it.
    async fn find_crate(
        &self,
        user_id: u64,
        crate_id: &str,
    ) -> Result<Option<VinylCrate>, CollectionRepositoryError>;

    /// Remove a crate, unfiling its records, and report whether it existed.
    async fn remove_crate(
        &self,
        user_id: u64,
        crate_id: &str,
    ) -> Result<bool, CollectionRepositoryError>;
}

/// Fixture store that holds nothing and accepts every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCollectionRepository;

#[async_trait]
impl CollectionRepository for FixtureCollectionRepository {
    async fn add_vinyl(&self, record: VinylRecord) -> Result<VinylRecord, CollectionRepositoryError> {
        Ok(record)
    }

    async fn upsert_vinyl(
        &self,
        record: VinylRecord,
    ) -> Result<VinylRecord, CollectionRepositoryError> {
        Ok(record)
    }

    async fn find_vinyl(
        &self,
        _key: VinylKey,
    ) -> Result<Option<VinylRecord>, CollectionRepositoryError> {
        Ok(None)
    }

    async fn remove_vinyl(&self, _key: VinylKey) -> Result<bool, CollectionRepositoryError> {
        Ok(false)
    }

    async fn list_vinyl(
        &self,
        _user_id: u64,
        _page: PageRequest,
    ) -> Result<VinylPage, CollectionRepositoryError> {
        Ok(VinylPage::default())
    }

    async fn create_crate(
        &self,
        user_id: u64,
        request: NewCrate,
    ) -> Result<VinylCrate, CollectionRepositoryError> {
        Ok(VinylCrate::new("fixture", user_id, request))
    }

    async fn find_crate(
        &self,
        _user_id: u64,
        _crate_id: &str,
    ) -> Result<Option<VinylCrate>, CollectionRepositoryError> {
        Ok(None)
    }

    async fn remove_crate(
        &self,
        _user_id: u64,
        _crate_id: &str,
    ) -> Result<bool, CollectionRepositoryError> {
        Ok(false)
    }
}
