//! SQLite connection setup and schema

use crate::{WebError, WebResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, error, info};

/// Open a pool for `database_url` and make sure the schema exists.
///
/// An in-memory database lives only as long as its connection, so memory
/// URLs get a single connection that is never recycled.
pub async fn connect(database_url: &str) -> WebResult<SqlitePool> {
    info!("Connecting to database: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| WebError::Database(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await.map_err(|e| {
        error!("Database connection failed: {}", e);
        WebError::Database(format!("Failed to connect to database: {}", e))
    })?;

    create_tables(&pool).await?;
    info!("Database ready");

    Ok(pool)
}

/// Create the tables if they do not exist yet
pub async fn create_tables(pool: &SqlitePool) -> WebResult<()> {
    debug!("Creating users table...");
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| WebError::Database(format!("Failed to create users table: {}", e)))?;

    debug!("Creating destinations table...");
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS destinations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id INTEGER NOT NULL REFERENCES users(id),
            name TEXT NOT NULL,
            location TEXT,
            travel_date TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| WebError::Database(format!("Failed to create destinations table: {}", e)))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_destinations_owner ON destinations(owner_id)")
        .execute(pool)
        .await
        .map_err(|e| WebError::Database(format!("Failed to create destinations index: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_database_keeps_schema() {
        let pool = connect("sqlite::memory:").await.unwrap();

        // Running twice must be harmless
        create_tables(&pool).await.unwrap();

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"destinations".to_string()));
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("voyage.db").display());

        let pool = connect(&url).await.unwrap();
        pool.close().await;

        assert!(dir.path().join("voyage.db").exists());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let result = connect("postgres://localhost/voyage").await;
        assert!(matches!(result, Err(WebError::Database(_))));
    }
}
