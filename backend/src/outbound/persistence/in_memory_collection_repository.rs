//! In-memory collection store.
//!
//! Stands in for the hosting environment's table binding. Records and crates
//! live in ordered maps behind one lock, so listings come back in key order
//! and a crate removal unfiles its records atomically.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::catalogue::{NewCrate, VinylCrate, VinylKey, VinylRecord};
use crate::domain::ports::{CollectionRepository, CollectionRepositoryError, VinylPage};

#[derive(Debug, Default)]
struct CollectionTables {
    records: BTreeMap<VinylKey, VinylRecord>,
    crates: BTreeMap<(u64, String), VinylCrate>,
}

impl CollectionTables {
    fn user_records(&self, user_id: u64) -> impl Iterator<Item = &VinylRecord> {
        self.records
            .range(VinylKey::new(user_id, 0, 0)..=VinylKey::new(user_id, u64::MAX, u64::MAX))
            .map(|(_, record)| record)
    }

    fn next_item(&self, user_id: u64, version_id: u64) -> Result<u64, CollectionRepositoryError> {
        let highest = self
            .records
            .range(VinylKey::new(user_id, version_id, 0)..=VinylKey::new(user_id, version_id, u64::MAX))
            .next_back()
            .map_or(0, |(key, _)| key.item);
        highest
            .checked_add(1)
            .ok_or_else(|| CollectionRepositoryError::items_exhausted(user_id, version_id))
    }

    fn check_crate(&self, record: &VinylRecord) -> Result<(), CollectionRepositoryError> {
        let Some(crate_id) = record.crate_id() else {
            return Ok(());
        };
        let user_id = record.key().user_id;
        if self.crates.contains_key(&(user_id, crate_id.to_owned())) {
            Ok(())
        } else {
            Err(CollectionRepositoryError::unknown_crate(user_id, crate_id))
        }
    }

    fn crate_records(&self, user_id: u64, crate_id: &str) -> Vec<VinylKey> {
        self.user_records(user_id)
            .filter(|record| record.crate_id() == Some(crate_id))
            .map(VinylRecord::key)
            .collect()
    }
}

/// Collection store held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCollectionRepository {
    tables: RwLock<CollectionTables>,
}

impl InMemoryCollectionRepository {
    /// Name reported by the readiness probe.
    pub const KIND: &'static str = "in-memory";

    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CollectionTables>, CollectionRepositoryError> {
        self.tables
            .read()
            .map_err(|_| CollectionRepositoryError::query("collection tables lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CollectionTables>, CollectionRepositoryError> {
        self.tables
            .write()
            .map_err(|_| CollectionRepositoryError::query("collection tables lock poisoned"))
    }
}

#[async_trait]
impl CollectionRepository for InMemoryCollectionRepository {
    async fn add_vinyl(&self, record: VinylRecord) -> Result<VinylRecord, CollectionRepositoryError> {
        let mut tables = self.write()?;
        tables.check_crate(&record)?;
        let key = record.key();
        let stored = record.with_item(tables.next_item(key.user_id, key.version_id)?);
        match tables.records.entry(stored.key()) {
            Entry::Vacant(slot) => Ok(slot.insert(stored).clone()),
            Entry::Occupied(taken) => {
                let key = *taken.key();
                Err(CollectionRepositoryError::item_occupied(
                    key.user_id,
                    key.version_id,
                    key.item,
                ))
            }
        }
    }

    async fn upsert_vinyl(
        &self,
        record: VinylRecord,
    ) -> Result<VinylRecord, CollectionRepositoryError> {
        let mut tables = self.write()?;
        tables.check_crate(&record)?;
        tables.records.insert(record.key(), record.clone());
        Ok(record)
    }

    async fn find_vinyl(
        &self,
        key: VinylKey,
    ) -> Result<Option<VinylRecord>, CollectionRepositoryError> {
        Ok(self.read()?.records.get(&key).cloned())
    }

    async fn remove_vinyl(&self, key: VinylKey) -> Result<bool, CollectionRepositoryError> {
        Ok(self.write()?.records.remove(&key).is_some())
    }

    async fn list_vinyl(
        &self,
        user_id: u64,
        page: PageRequest,
    ) -> Result<VinylPage, CollectionRepositoryError> {
        let tables = self.read()?;
        let owned: Vec<&VinylRecord> = tables.user_records(user_id).collect();
        Ok(VinylPage {
            records: page.slice(&owned).iter().map(|record| (*record).clone()).collect(),
            total: owned.len() as u64,
        })
    }

    async fn create_crate(
        &self,
        user_id: u64,
        request: NewCrate,
    ) -> Result<VinylCrate, CollectionRepositoryError> {
        let created = VinylCrate::new(Uuid::new_v4().to_string(), user_id, request);
        self.write()?
            .crates
            .insert((user_id, created.crate_id().to_owned()), created.clone());
        Ok(created)
    }

    async fn find_crate(
        &self,
        user_id: u64,
        crate_id: &str,
    ) -> Result<Option<VinylCrate>, CollectionRepositoryError> {
        let tables = self.read()?;
        Ok(tables
            .crates
            .get(&(user_id, crate_id.to_owned()))
            .map(|found| found.clone().with_records(tables.crate_records(user_id, crate_id))))
    }

    async fn remove_crate(
        &self,
        user_id: u64,
        crate_id: &str,
    ) -> Result<bool, CollectionRepositoryError> {
        let mut tables = self.write()?;
        if tables.crates.remove(&(user_id, crate_id.to_owned())).is_none() {
            return Ok(false);
        }
        for key in tables.crate_records(user_id, crate_id) {
            if let Some(record) = tables.records.get_mut(&key) {
                record.clear_crate();
            }
        }
        Ok(true)
    }
}
