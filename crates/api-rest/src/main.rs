//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the registry REST API on its own.
//!
//! ## Intended use
//! Useful for development when only the HTTP API is wanted. The workspace's main
//! `registry-run` binary additionally loads a `.env` file before starting the same server.

use registry_core::{CoreConfig, RegistryService};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the registry REST API server
///
/// # Environment Variables
/// - `REGISTRY_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `REGISTRY_DATA_FILE`: Registry JSON file (default: "pacientes.json")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("registry_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("REGISTRY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = Arc::new(CoreConfig::from_optional(
        std::env::var("REGISTRY_DATA_FILE").ok(),
    ));

    api_rest::serve(&addr, RegistryService::new(cfg)).await
}
