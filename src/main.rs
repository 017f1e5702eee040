use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use registry_core::{CoreConfig, RegistryService};

/// Main entry point for the patient registry application
///
/// Loads `.env` if present, resolves configuration once, then serves the REST API.
///
/// # Environment Variables
/// - `REGISTRY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `REGISTRY_DATA_FILE`: Registry JSON file (default: "pacientes.json")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("registry_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("registry_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("REGISTRY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = Arc::new(CoreConfig::from_optional(
        std::env::var("REGISTRY_DATA_FILE").ok(),
    ));

    tracing::info!("++ Starting patient registry on {}", rest_addr);

    api_rest::serve(&rest_addr, RegistryService::new(cfg)).await
}
