//! Voyage Web Server
//!
//! Binds the listener and serves the application router until shutdown.

use crate::{create_app, AppState, PasswordCost, WebConfig, WebError, WebResult};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main Voyage web server
pub struct VoyageServer {
    state: AppState,
}

impl VoyageServer {
    /// Create a new server; stores are opened here, before anything binds
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let state = AppState::new(config).await?;
        Ok(Self { state })
    }

    /// Start the web server and run until Ctrl+C
    pub async fn start(self) -> WebResult<()> {
        let address = self.config().address();
        info!("Starting Voyage Web Server");

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down gracefully");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.state.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Builder for VoyageServer
pub struct VoyageServerBuilder {
    config: WebConfig,
}

impl VoyageServerBuilder {
    /// Start from a loaded configuration
    pub fn new(config: WebConfig) -> Self {
        Self { config }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set database URL
    pub fn database_url<S: Into<String>>(mut self, database_url: S) -> Self {
        self.config.database_url = Some(database_url.into());
        self
    }

    /// Set the password hashing cost
    pub fn password_cost(mut self, cost: PasswordCost) -> Self {
        self.config.password_cost = cost;
        self
    }

    /// Build the server
    pub async fn build(self) -> WebResult<VoyageServer> {
        VoyageServer::new(self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WebConfig {
        WebConfig::with_secret("server-test-secret")
    }

    #[tokio::test]
    async fn test_server_creation() {
        let server = VoyageServerBuilder::new(config())
            .password_cost(PasswordCost::MINIMUM)
            .build()
            .await
            .unwrap();

        assert_eq!(server.config().port, 3000);
        assert_eq!(server.state().storage_backend(), "memory");
    }

    #[test]
    fn test_server_builder() {
        let builder = VoyageServerBuilder::new(config())
            .host("0.0.0.0")
            .port(8081)
            .database_url("sqlite://voyage.db");

        assert_eq!(builder.config.host, "0.0.0.0");
        assert_eq!(builder.config.port, 8081);
        assert_eq!(
            builder.config.database_url.as_deref(),
            Some("sqlite://voyage.db")
        );
    }

    #[tokio::test]
    async fn test_bad_database_url_fails_before_binding() {
        let result = VoyageServerBuilder::new(config())
            .database_url("mysql://nowhere")
            .build()
            .await;

        assert!(matches!(result, Err(WebError::Database(_))));
    }
}
