//! SQLite-backed destination storage

use super::{Destination, DestinationChanges, NewDestination};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, error};
use voyage_core::{VoyageError, VoyageResult};

const COMPONENT: &str = "destination_store";

const COLUMNS: &str =
    "id, owner_id, name, location, travel_date, notes, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct DestinationRecord {
    id: i64,
    owner_id: i64,
    name: String,
    location: Option<String>,
    travel_date: DateTime<Utc>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DestinationRecord> for Destination {
    fn from(record: DestinationRecord) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            name: record.name,
            location: record.location,
            travel_date: record.travel_date,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

fn query_failed(operation: &str, e: sqlx::Error) -> VoyageError {
    error!("Failed to {}: {}", operation, e);
    VoyageError::storage(format!("failed to {operation}"), COMPONENT, e)
        .with_operation(operation)
}

fn into_destinations(records: Vec<DestinationRecord>) -> Vec<Destination> {
    records.into_iter().map(Destination::from).collect()
}

/// Database-backed destination store
#[derive(Debug, Clone)]
pub struct DatabaseDestinationStore {
    pool: SqlitePool,
}

impl DatabaseDestinationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: NewDestination) -> VoyageResult<Destination> {
        let now = Utc::now();

        let record = sqlx::query_as::<_, DestinationRecord>(&format!(
            r#"
            INSERT INTO destinations
                (owner_id, name, location, travel_date, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.owner_id)
        .bind(&new.name)
        .bind(&new.location)
        .bind(new.travel_date)
        .bind(&new.notes)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("insert destination", e))?;

        debug!("Destination inserted: {}", record.id);
        Ok(record.into())
    }

    pub async fn list_all(&self) -> VoyageResult<Vec<Destination>> {
        let records = sqlx::query_as::<_, DestinationRecord>(&format!(
            "SELECT {COLUMNS} FROM destinations ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_failed("list destinations", e))?;

        Ok(into_destinations(records))
    }

    pub async fn list_by_owner(&self, owner_id: i64) -> VoyageResult<Vec<Destination>> {
        let records = sqlx::query_as::<_, DestinationRecord>(&format!(
            "SELECT {COLUMNS} FROM destinations WHERE owner_id = ? ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_failed("list destinations by owner", e))?;

        Ok(into_destinations(records))
    }

    pub async fn find_owned(&self, id: i64, owner_id: i64) -> VoyageResult<Option<Destination>> {
        let record = sqlx::query_as::<_, DestinationRecord>(&format!(
            "SELECT {COLUMNS} FROM destinations WHERE id = ? AND owner_id = ?"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("find destination", e))?;

        Ok(record.map(Destination::from))
    }

    /// Absent changes keep their stored column value.
    ///
    /// The nullable columns take a flag saying whether the change is present,
    /// so that a present `None` writes NULL.
    pub async fn update(
        &self,
        id: i64,
        changes: &DestinationChanges,
    ) -> VoyageResult<Option<Destination>> {
        let record = sqlx::query_as::<_, DestinationRecord>(&format!(
            r#"
            UPDATE destinations SET
                name = COALESCE(?, name),
                location = CASE WHEN ? THEN ? ELSE location END,
                travel_date = COALESCE(?, travel_date),
                notes = CASE WHEN ? THEN ? ELSE notes END,
                updated_at = ?
            WHERE id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&changes.name)
        .bind(changes.location.is_some())
        .bind(changes.location.clone().flatten())
        .bind(changes.travel_date)
        .bind(changes.notes.is_some())
        .bind(changes.notes.clone().flatten())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("update destination", e))?;

        Ok(record.map(Destination::from))
    }

    pub async fn delete(&self, id: i64) -> VoyageResult<Option<Destination>> {
        let record = sqlx::query_as::<_, DestinationRecord>(&format!(
            "DELETE FROM destinations WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("delete destination", e))?;

        Ok(record.map(Destination::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::database::DatabaseUserStore, database, destinations::parse_travel_date};

    /// Store plus two registered owners with ids 1 and 2
    async fn store() -> DatabaseDestinationStore {
        let pool = database::connect("sqlite::memory:").await.unwrap();
        let users = DatabaseUserStore::new(pool.clone());
        users.insert("a@x.com", "h1").await.unwrap();
        users.insert("b@x.com", "h2").await.unwrap();
        DatabaseDestinationStore::new(pool)
    }

    fn kyoto(owner_id: i64) -> NewDestination {
        NewDestination {
            owner_id,
            name: "Kyoto".to_string(),
            location: Some("Japan".to_string()),
            travel_date: parse_travel_date("2025-06-01").unwrap(),
            notes: Some("temples".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_scoped_lookup() {
        let store = store().await;
        let created = store.insert(kyoto(1)).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.owner_id, 1);
        assert_eq!(created.travel_date, parse_travel_date("2025-06-01").unwrap());

        assert_eq!(store.find_owned(created.id, 1).await.unwrap(), Some(created.clone()));
        assert!(store.find_owned(created.id, 2).await.unwrap().is_none());
        assert!(store.find_owned(99, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listing() {
        let store = store().await;
        store.insert(kyoto(1)).await.unwrap();
        store.insert(kyoto(2)).await.unwrap();
        store.insert(kyoto(1)).await.unwrap();

        let ids: Vec<i64> = store
            .list_by_owner(1)
            .await
            .unwrap()
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_columns() {
        let store = store().await;
        let created = store.insert(kyoto(1)).await.unwrap();

        let changes = DestinationChanges {
            name: Some("x".to_string()),
            ..Default::default()
        };
        let updated = store.update(created.id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.name, "x");
        assert_eq!(updated.location, created.location);
        assert_eq!(updated.travel_date, created.travel_date);
        assert_eq!(updated.notes, created.notes);
        assert_eq!(updated.owner_id, created.owner_id);
        assert_eq!(updated.created_at, created.created_at);

        assert!(store.update(99, &changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_present_null_clears_nullable_column() {
        let store = store().await;
        let created = store.insert(kyoto(1)).await.unwrap();

        let changes = DestinationChanges {
            location: Some(None),
            ..Default::default()
        };
        let updated = store.update(created.id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.location, None);
        assert_eq!(updated.notes, created.notes);
        assert_eq!(updated.name, created.name);

        let changes = DestinationChanges {
            notes: Some(Some("gardens".to_string())),
            ..Default::default()
        };
        let updated = store.update(created.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.location, None);
        assert_eq!(updated.notes.as_deref(), Some("gardens"));
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot_once() {
        let store = store().await;
        let created = store.insert(kyoto(1)).await.unwrap();

        assert_eq!(store.delete(created.id).await.unwrap(), Some(created.clone()));
        assert!(store.delete(created.id).await.unwrap().is_none());
    }
}
