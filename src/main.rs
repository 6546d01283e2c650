mod config;
mod rooms;
mod routes;
mod state;
mod ws;

use std::sync::Arc;
use tokio::net::TcpListener;

use config::{generate_config_template, Config};
use rooms::{RegistryPolicy, RoomRegistry};
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load config with layered precedence: defaults < TOML < env < CLI
    let config = Config::load()?;

    // Handle --generate-config: print template and exit
    if config.generate_config {
        print!("{}", generate_config_template());
        return Ok(());
    }

    // Initialize tracing/logging
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "roomcast=info".parse().unwrap()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "roomcast=info".parse().unwrap()),
            )
            .init();
    }

    tracing::info!("roomcast v{} starting", env!("CARGO_PKG_VERSION"));

    let registry = RoomRegistry::new(RegistryPolicy {
        strict_create: config.strict_create,
        owner_gated_delete: config.owner_gated_delete,
        history_limit: config.history_limit,
    });
    let state = AppState {
        rooms: Arc::new(registry),
    };

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        strict_create = config.strict_create,
        owner_gated_delete = config.owner_gated_delete,
        "Listening on {}",
        addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
