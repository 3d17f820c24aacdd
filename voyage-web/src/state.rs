//! Application state shared by every request handler

use crate::{
    auth::{
        database::DatabaseUserStore,
        jwt::TokenService,
        password::PasswordHasher,
        users::{UserService, UserStore},
    },
    database,
    destinations::{database::DatabaseDestinationStore, DestinationService, DestinationStore},
    WebConfig, WebResult,
};
use chrono::Duration;
use std::sync::Arc;
use tracing::info;

/// Services wired together once at startup.
///
/// Cloning is cheap; the stores behind the services are shared.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<WebConfig>,
    pub tokens: TokenService,
    pub user_service: UserService,
    pub destination_service: DestinationService,
}

impl AppState {
    /// Build the state, opening the database when one is configured
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let (user_store, destination_store) = match config.database_url.as_deref() {
            Some(url) => {
                let pool = database::connect(url).await?;
                info!("Using SQLite storage");
                (
                    UserStore::database(DatabaseUserStore::new(pool.clone())),
                    DestinationStore::database(DatabaseDestinationStore::new(pool)),
                )
            }
            None => {
                info!("Using in-memory storage");
                (UserStore::memory(), DestinationStore::memory())
            }
        };

        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            Duration::seconds(config.token_ttl_secs),
        );
        let hasher = PasswordHasher::new(config.password_cost)?;

        Ok(Self {
            user_service: UserService::new(user_store, hasher, tokens.clone()),
            destination_service: DestinationService::new(destination_store),
            tokens,
            config: Arc::new(config),
        })
    }

    /// Name of the storage backend in use
    pub fn storage_backend(&self) -> &'static str {
        if self.config.database_url.is_some() {
            "sqlite"
        } else {
            "memory"
        }
    }
}
