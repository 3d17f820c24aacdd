//! Destination persistence

use super::{database::DatabaseDestinationStore, Destination, DestinationChanges, NewDestination};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use voyage_core::VoyageResult;

/// In-memory destination table
#[derive(Debug, Default)]
pub struct MemoryDestinations {
    records: BTreeMap<i64, Destination>,
    last_id: i64,
}

/// Destination store supporting both in-memory and database storage.
///
/// Each call is atomic on its own. Nothing here checks ownership beyond
/// [`DestinationStore::find_owned`].
#[derive(Debug, Clone)]
pub enum DestinationStore {
    Memory(Arc<RwLock<MemoryDestinations>>),
    Database(DatabaseDestinationStore),
}

impl DestinationStore {
    pub fn memory() -> Self {
        Self::Memory(Arc::new(RwLock::new(MemoryDestinations::default())))
    }

    pub fn database(database_store: DatabaseDestinationStore) -> Self {
        Self::Database(database_store)
    }

    pub async fn insert(&self, new: NewDestination) -> VoyageResult<Destination> {
        match self {
            Self::Memory(table) => {
                let mut table = table.write().await;
                table.last_id += 1;

                let now = Utc::now();
                let destination = Destination {
                    id: table.last_id,
                    owner_id: new.owner_id,
                    name: new.name,
                    location: new.location,
                    travel_date: new.travel_date,
                    notes: new.notes,
                    created_at: now,
                    updated_at: now,
                };

                table.records.insert(destination.id, destination.clone());
                Ok(destination)
            }
            Self::Database(db_store) => db_store.insert(new).await,
        }
    }

    /// Every record, ordered by id
    pub async fn list_all(&self) -> VoyageResult<Vec<Destination>> {
        match self {
            Self::Memory(table) => Ok(table.read().await.records.values().cloned().collect()),
            Self::Database(db_store) => db_store.list_all().await,
        }
    }

    /// Records owned by `owner_id`, ordered by id
    pub async fn list_by_owner(&self, owner_id: i64) -> VoyageResult<Vec<Destination>> {
        match self {
            Self::Memory(table) => Ok(table
                .read()
                .await
                .records
                .values()
                .filter(|d| d.owner_id == owner_id)
                .cloned()
                .collect()),
            Self::Database(db_store) => db_store.list_by_owner(owner_id).await,
        }
    }

    /// Look up a record by id and owner together
    pub async fn find_owned(&self, id: i64, owner_id: i64) -> VoyageResult<Option<Destination>> {
        match self {
            Self::Memory(table) => Ok(table
                .read()
                .await
                .records
                .get(&id)
                .filter(|d| d.owner_id == owner_id)
                .cloned()),
            Self::Database(db_store) => db_store.find_owned(id, owner_id).await,
        }
    }

    /// Apply changes to a record by id. Returns `None` if it no longer exists.
    pub async fn update(
        &self,
        id: i64,
        changes: &DestinationChanges,
    ) -> VoyageResult<Option<Destination>> {
        match self {
            Self::Memory(table) => {
                let mut table = table.write().await;
                Ok(table.records.get_mut(&id).map(|destination| {
                    changes.apply_to(destination);
                    destination.updated_at = Utc::now();
                    destination.clone()
                }))
            }
            Self::Database(db_store) => db_store.update(id, changes).await,
        }
    }

    /// Delete a record by id, returning it as it was
    pub async fn delete(&self, id: i64) -> VoyageResult<Option<Destination>> {
        match self {
            Self::Memory(table) => Ok(table.write().await.records.remove(&id)),
            Self::Database(db_store) => db_store.delete(id).await,
        }
    }
}
