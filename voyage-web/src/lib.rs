//! Voyage Web Server
//!
//! Account signup/signin with stateless bearer tokens, plus per-user
//! management of travel destinations.

pub mod auth;
pub mod database;
pub mod destinations;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use auth::password::PasswordCost;
pub use error::ApiError;
pub use server::VoyageServer;
pub use state::AppState;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use voyage_core::{LogFormat, LoggingConfig, VoyageError};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::auth_routes())
        .merge(routes::destination_routes(state.clone()))
        .merge(routes::health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB max body size
        .with_state(state)
}

/// Configuration for the web server
#[derive(Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Secret used to sign and verify identity tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in seconds
    pub token_ttl_secs: i64,
    /// SQLite database URL; in-memory stores are used when absent
    pub database_url: Option<String>,
    /// Argon2 cost parameters for password hashing
    pub password_cost: PasswordCost,
}

impl std::fmt::Debug for WebConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("database_url", &self.database_url)
            .field("password_cost", &self.password_cost)
            .finish()
    }
}

/// Error returned when loading configuration fails.
///
/// Any of these is fatal: the process must not start serving.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

impl WebConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

    /// Configuration with defaults for everything except the signing secret
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: Self::DEFAULT_TOKEN_TTL_SECS,
            database_url: None,
            password_cost: PasswordCost::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `JWT_SECRET`: token signing secret (required, non-empty)
    /// - `VOYAGE_HOST`: bind host (default: `127.0.0.1`)
    /// - `PORT`: listen port (default: `3000`)
    /// - `DATABASE_URL`: SQLite URL (default: in-memory stores)
    /// - `VOYAGE_TOKEN_TTL_SECS`: token lifetime (default: `3600`)
    /// - `VOYAGE_ARGON2_MEMORY_KIB`, `VOYAGE_ARGON2_ITERATIONS`,
    ///   `VOYAGE_ARGON2_PARALLELISM`: password hashing cost
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        let defaults = PasswordCost::default();
        let password_cost = PasswordCost {
            memory_kib: parse_var(&lookup, "VOYAGE_ARGON2_MEMORY_KIB")?.unwrap_or(defaults.memory_kib),
            iterations: parse_var(&lookup, "VOYAGE_ARGON2_ITERATIONS")?.unwrap_or(defaults.iterations),
            parallelism: parse_var(&lookup, "VOYAGE_ARGON2_PARALLELISM")?
                .unwrap_or(defaults.parallelism),
        };

        let token_ttl_secs =
            parse_var(&lookup, "VOYAGE_TOKEN_TTL_SECS")?.unwrap_or(Self::DEFAULT_TOKEN_TTL_SECS);
        if token_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "VOYAGE_TOKEN_TTL_SECS".to_string(),
                message: "must be a positive number of seconds".to_string(),
            });
        }

        Ok(Self {
            host: lookup("VOYAGE_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            port: parse_var(&lookup, "PORT")?.unwrap_or(Self::DEFAULT_PORT),
            jwt_secret,
            token_ttl_secs,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            password_cost,
        })
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|value| {
            value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{value}': {e}"),
            })
        })
        .transpose()
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] VoyageError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging(level: &str, format: LogFormat) -> WebResult<()> {
    let config = LoggingConfig {
        format,
        ..LoggingConfig::with_level(level)
    };
    voyage_core::init_logging(&config).map_err(|e| {
        WebError::Config(ConfigError::InvalidValue {
            name: "log level".to_string(),
            message: e.to_string(),
        })
    })
}
