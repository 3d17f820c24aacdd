//! Voyage Web Server
//!
//! Accounts with bearer-token sign-in and per-user travel destinations.

use clap::Parser;
use tracing::{error, info};
use voyage_core::LogFormat;
use voyage_web::server::VoyageServerBuilder;
use voyage_web::{init_logging, WebConfig};

/// Voyage Web Server - travel destinations behind token-based accounts
#[derive(Parser, Debug)]
#[command(name = "voyage-web")]
#[command(about = "Serve the Voyage API")]
#[command(version)]
struct Args {
    /// Server host to bind to (overrides VOYAGE_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database URL (overrides DATABASE_URL; in-memory when unset)
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format (compact, pretty, json)
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // A missing .env file is fine
    dotenvy::dotenv().ok();

    if let Err(e) = init_logging(&args.log_level, args.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let config = match WebConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut builder = VoyageServerBuilder::new(config);
    if let Some(host) = args.host {
        builder = builder.host(host);
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(database_url) = args.database_url {
        builder = builder.database_url(database_url);
    }

    let server = match builder.build().await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    info!(config = ?server.config(), "Server configured");

    if let Err(e) = server.start().await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
