//! deploy-smoke: deployment smoke-test server.
//!
//! This is the application entry point. It initializes tracing on stderr,
//! binds the fixed listen address, prints the startup line to stdout and
//! serves until the process is terminated. Command-line arguments are ignored.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deploy_smoke::config::{ListenConfig, DEFAULT_LOG_FILTER};
use deploy_smoke::start_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with priority: env > default
    let log_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

    // Stdout is reserved for the startup line
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ListenConfig::default();
    tracing::info!(host = %config.host, port = config.port, "Starting server");

    if let Err(e) = start_server(&config).await {
        tracing::error!(error = %e, "Server failed");
        return Err(e.into());
    }

    Ok(())
}
