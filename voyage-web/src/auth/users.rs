//! User management and authentication

use super::{database::DatabaseUserStore, jwt::TokenService, password::PasswordHasher};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use voyage_core::{VoyageError, VoyageResult};

const INVALID_CREDENTIALS: &str =
    "Email or password is incorrect, please provide valid credentials";
const EMAIL_TAKEN: &str = "User already exists, try a different email";

/// Signup and signin request body
#[derive(Deserialize, ToSchema)]
pub struct Credentials {
    #[schema(example = "a@x.com")]
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public user information
#[derive(Debug, Serialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Signin response: the user plus a freshly issued token
#[derive(Debug, Serialize, ToSchema)]
pub struct SigninResponse {
    #[serde(flatten)]
    pub user: UserInfo,
    pub token: String,
}

/// Internal user data with password hash
#[derive(Clone)]
pub struct UserData {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserData")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl UserData {
    /// Convert to public user info
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// In-memory user table
#[derive(Debug, Default)]
pub struct MemoryUsers {
    users: BTreeMap<i64, UserData>,
    ids_by_email: HashMap<String, i64>,
    last_id: i64,
}

/// User store abstraction supporting both in-memory and database storage
#[derive(Debug, Clone)]
pub enum UserStore {
    /// In-memory storage (for development and testing)
    Memory(Arc<RwLock<MemoryUsers>>),
    /// Database storage (for production)
    Database(DatabaseUserStore),
}

impl UserStore {
    /// Create in-memory user store
    pub fn memory() -> Self {
        Self::Memory(Arc::new(RwLock::new(MemoryUsers::default())))
    }

    /// Create database user store
    pub fn database(database_store: DatabaseUserStore) -> Self {
        Self::Database(database_store)
    }

    pub async fn email_exists(&self, email: &str) -> VoyageResult<bool> {
        match self {
            Self::Memory(users) => Ok(users.read().await.ids_by_email.contains_key(email)),
            Self::Database(db_store) => db_store.email_exists(email).await,
        }
    }

    pub async fn find_by_email(&self, email: &str) -> VoyageResult<Option<UserData>> {
        match self {
            Self::Memory(users) => {
                let users = users.read().await;
                Ok(users
                    .ids_by_email
                    .get(email)
                    .and_then(|id| users.users.get(id))
                    .cloned())
            }
            Self::Database(db_store) => db_store.find_by_email(email).await,
        }
    }

    pub async fn find_by_id(&self, id: i64) -> VoyageResult<Option<UserData>> {
        match self {
            Self::Memory(users) => Ok(users.read().await.users.get(&id).cloned()),
            Self::Database(db_store) => db_store.find_by_id(id).await,
        }
    }

    /// Number of stored users
    pub async fn count(&self) -> VoyageResult<u64> {
        match self {
            Self::Memory(users) => Ok(users.read().await.users.len() as u64),
            Self::Database(db_store) => db_store.count().await,
        }
    }

    /// Insert a new user.
    ///
    /// Email uniqueness is enforced atomically with the write, so two
    /// concurrent inserts for one email cannot both succeed.
    pub async fn insert(&self, email: &str, password_hash: String) -> VoyageResult<UserData> {
        match self {
            Self::Memory(users) => {
                let mut users = users.write().await;

                if users.ids_by_email.contains_key(email) {
                    return Err(VoyageError::conflict(EMAIL_TAKEN));
                }

                users.last_id += 1;
                let user = UserData {
                    id: users.last_id,
                    email: email.to_string(),
                    password_hash,
                    created_at: Utc::now(),
                };

                users.ids_by_email.insert(user.email.clone(), user.id);
                users.users.insert(user.id, user.clone());
                Ok(user)
            }
            Self::Database(db_store) => db_store.insert(email, &password_hash).await,
        }
    }
}

/// User service for authentication operations
#[derive(Debug, Clone)]
pub struct UserService {
    store: UserStore,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl UserService {
    pub fn new(store: UserStore, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Register new user
    pub async fn register(&self, credentials: Credentials) -> VoyageResult<UserInfo> {
        debug!("Starting user registration for: {}", credentials.email);

        if self.store.email_exists(&credentials.email).await? {
            debug!(
                "Registration failed: email '{}' already exists",
                credentials.email
            );
            return Err(VoyageError::conflict(EMAIL_TAKEN));
        }

        let hasher = self.hasher.clone();
        let password = credentials.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| VoyageError::internal(format!("hashing task failed: {e}"), "users"))??;

        let user = self.store.insert(&credentials.email, password_hash).await?;

        info!(user_id = user.id, "Registered new user: {}", user.email);
        Ok(user.to_user_info())
    }

    /// Check credentials and issue a token.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn authenticate(&self, credentials: Credentials) -> VoyageResult<SigninResponse> {
        let user = self.store.find_by_email(&credentials.email).await?;

        let hasher = self.hasher.clone();
        let password = credentials.password;
        let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
        let valid = tokio::task::spawn_blocking(move || match stored_hash {
            Some(stored_hash) => hasher.verify(&password, &stored_hash),
            None => hasher.verify_missing(&password),
        })
        .await
        .map_err(|e| VoyageError::internal(format!("verification task failed: {e}"), "users"))?;

        let user = match user {
            Some(user) if valid => user,
            Some(user) => {
                warn!(user_id = user.id, "Sign-in failed: wrong password");
                return Err(VoyageError::unauthorized(INVALID_CREDENTIALS));
            }
            None => {
                warn!("Sign-in failed: unknown email");
                return Err(VoyageError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let token = self.tokens.issue(user.id)?;

        info!(user_id = user.id, "User signed in");
        Ok(SigninResponse {
            user: user.to_user_info(),
            token,
        })
    }

    /// Get user store (for testing)
    pub fn store(&self) -> &UserStore {
        &self.store
    }
}
