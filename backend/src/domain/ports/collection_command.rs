//! Driving port for changes to a user's collection.
//!
//! Inbound adapters validate route parameters and bodies before calling this
//! port, so requests arrive with positive identifiers and well-formed details.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::Error;
use crate::domain::catalogue::{NewCrate, VinylCrate, VinylDetails, VinylKey, VinylRecord};

/// Request to add or update one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreVinylRequest {
    /// Owning user.
    pub user_id: u64,
    /// Release version being stored.
    pub version_id: u64,
    /// Item to replace; `None` stores the next free item.
    pub item: Option<u64>,
    /// Details to record alongside the item.
    pub details: VinylDetails,
}

/// Driving port for collection writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionCommand: Send + Sync {
    /// Add or update a record, resolving its release through the provider.
    async fn store_vinyl(&self, request: StoreVinylRequest) -> Result<VinylRecord, Error>;

    /// Remove a record; absent records yield a not-found error.
    async fn remove_vinyl(&self, key: VinylKey) -> Result<(), Error>;

    /// Create an empty crate.
    async fn create_crate(&self, user_id: u64, request: NewCrate) -> Result<VinylCrate, Error>;

    /// Remove a crate; absent crates yield a not-found error.
    async fn remove_crate(&self, user_id: u64, crate_id: String) -> Result<(), Error>;
}

/// Fixture command that echoes requests back as stored records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCollectionCommand;

#[async_trait]
impl CollectionCommand for FixtureCollectionCommand {
    async fn store_vinyl(&self, request: StoreVinylRequest) -> Result<VinylRecord, Error> {
        let key = VinylKey::new(request.user_id, request.version_id, request.item.unwrap_or(1));
        let added = NaiveDate::from_ymd_opt(2024, 1, 1)
            .ok_or_else(|| Error::internal("fixture date is out of range"))?;
        Ok(VinylRecord::new(key, request.version_id, added).with_details(request.details))
    }

    async fn remove_vinyl(&self, _key: VinylKey) -> Result<(), Error> {
        Ok(())
    }

    async fn create_crate(&self, user_id: u64, request: NewCrate) -> Result<VinylCrate, Error> {
        Ok(VinylCrate::new("fixture", user_id, request))
    }

    async fn remove_crate(&self, _user_id: u64, _crate_id: String) -> Result<(), Error> {
        Ok(())
    }
}
