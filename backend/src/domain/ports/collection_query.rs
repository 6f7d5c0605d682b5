//! Driving port for reading a user's collection.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::Error;
use crate::domain::catalogue::{VinylCrate, VinylKey, VinylRecord};

use super::VinylPage;

/// Driving port for collection reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionQuery: Send + Sync {
    /// Fetch one record; absent records yield a not-found error.
    async fn fetch_vinyl(&self, key: VinylKey) -> Result<VinylRecord, Error>;

    /// Page through a user's records.
    async fn list_vinyl(&self, user_id: u64, page: PageRequest) -> Result<VinylPage, Error>;

    /// Fetch a crate with the keys of the records filed in it.
    async fn fetch_crate(&self, user_id: u64, crate_id: String) -> Result<VinylCrate, Error>;
}

/// Fixture query over an empty collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCollectionQuery;

#[async_trait]
impl CollectionQuery for FixtureCollectionQuery {
    async fn fetch_vinyl(&self, key: VinylKey) -> Result<VinylRecord, Error> {
        Err(Error::not_found(format!(
            "user {} holds no item {} of version {}",
            key.user_id, key.item, key.version_id
        )))
    }

    async fn list_vinyl(&self, _user_id: u64, _page: PageRequest) -> Result<VinylPage, Error> {
        Ok(VinylPage::default())
    }

    async fn fetch_crate(&self, user_id: u64, crate_id: String) -> Result<VinylCrate, Error> {
        Err(Error::not_found(format!(
            "crate {crate_id} not found for user {user_id}"
        )))
    }
}
