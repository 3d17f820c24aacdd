//! Ownership-scoped destination operations

use super::{
    CreateDestination, Destination, DestinationChanges, DestinationPatch, DestinationStore,
    NewDestination,
};
use tracing::{debug, info};
use voyage_core::{VoyageError, VoyageResult};

fn not_found(id: i64) -> VoyageError {
    VoyageError::not_found(format!("Destination not found for id: {id}"))
}

/// Destination operations on behalf of an authenticated owner.
///
/// `update` and `remove` look the record up by `(id, owner)` and then write
/// by id alone. The two steps are not atomic; if the record disappears in
/// between, the write finds nothing and the call reports not found.
#[derive(Debug, Clone)]
pub struct DestinationService {
    store: DestinationStore,
}

impl DestinationService {
    pub fn new(store: DestinationStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner_id: i64, input: CreateDestination) -> VoyageResult<Destination> {
        let new = NewDestination::from_request(owner_id, input)?;
        let destination = self.store.insert(new).await?;

        info!(
            owner_id,
            destination_id = destination.id,
            "Created destination"
        );
        Ok(destination)
    }

    /// Every destination regardless of owner
    pub async fn list_all(&self) -> VoyageResult<Vec<Destination>> {
        self.store.list_all().await
    }

    pub async fn list_for_owner(&self, owner_id: i64) -> VoyageResult<Vec<Destination>> {
        self.store.list_by_owner(owner_id).await
    }

    /// A record that exists but belongs to someone else is reported as not found
    pub async fn find_one(&self, owner_id: i64, id: i64) -> VoyageResult<Destination> {
        self.store.find_owned(id, owner_id).await?.ok_or_else(|| {
            debug!(owner_id, destination_id = id, "Destination lookup rejected");
            not_found(id)
        })
    }

    pub async fn update(
        &self,
        owner_id: i64,
        id: i64,
        patch: DestinationPatch,
    ) -> VoyageResult<Destination> {
        let current = self.find_one(owner_id, id).await?;
        let changes = DestinationChanges::from_patch(patch)?;

        if changes.is_empty() {
            return Ok(current);
        }

        let updated = self.write_changes(id, &changes).await?;

        info!(owner_id, destination_id = id, "Updated destination");
        Ok(updated)
    }

    /// Delete an owned destination, returning it as it was
    pub async fn remove(&self, owner_id: i64, id: i64) -> VoyageResult<Destination> {
        self.find_one(owner_id, id).await?;

        let removed = self.delete_by_id(id).await?;

        info!(owner_id, destination_id = id, "Deleted destination");
        Ok(removed)
    }

    async fn write_changes(
        &self,
        id: i64,
        changes: &DestinationChanges,
    ) -> VoyageResult<Destination> {
        self.store
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn delete_by_id(&self, id: i64) -> VoyageResult<Destination> {
        self.store.delete(id).await?.ok_or_else(|| not_found(id))
    }
}
