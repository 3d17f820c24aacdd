//! Database-backed user storage implementation

use super::users::UserData;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, error};
use voyage_core::{VoyageError, VoyageResult};

const COMPONENT: &str = "user_store";

/// Database user record
#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: i64,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserData {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            password_hash: record.password_hash,
            created_at: record.created_at,
        }
    }
}

fn query_failed(operation: &str, e: sqlx::Error) -> VoyageError {
    error!("Failed to {}: {}", operation, e);
    VoyageError::storage(format!("failed to {operation}"), COMPONENT, e)
        .with_operation(operation)
}

/// Database-backed user store
#[derive(Debug, Clone)]
pub struct DatabaseUserStore {
    pool: SqlitePool,
}

impl DatabaseUserStore {
    /// Create new database user store over a pool whose schema is in place
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check if email exists
    pub async fn email_exists(&self, email: &str) -> VoyageResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_failed("check email existence", e))?;

        Ok(count > 0)
    }

    /// Get user by email
    pub async fn find_by_email(&self, email: &str) -> VoyageResult<Option<UserData>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("query user by email", e))?;

        Ok(record.map(UserData::from))
    }

    /// Get user by ID
    pub async fn find_by_id(&self, id: i64) -> VoyageResult<Option<UserData>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("query user by id", e))?;

        Ok(record.map(UserData::from))
    }

    pub async fn count(&self) -> VoyageResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_failed("count users", e))?;

        Ok(count.max(0) as u64)
    }

    /// Insert user; the UNIQUE constraint on email surfaces as a conflict
    pub async fn insert(&self, email: &str, password_hash: &str) -> VoyageResult<UserData> {
        let created_at = Utc::now();

        let result = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, password_hash, created_at)
            VALUES (?, ?, ?)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => {
                debug!("User inserted successfully: {}", record.id);
                Ok(record.into())
            }
            Err(sqlx::Error::Database(db_error)) if db_error.is_unique_violation() => Err(
                VoyageError::conflict("User already exists, try a different email"),
            ),
            Err(e) => Err(query_failed("insert user", e)),
        }
    }
}
