use std::sync::Arc;

use shelter_core::config::config_dir;
use shelter_core::{init_tracing, DefaultSecretResolver, ShelterConfig};
use shelter_data::InMemoryStore;
use shelter_server::{build_router, shutdown_signal, AppState, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ShelterConfig::load_from_dir(&config_dir(), "dev", &DefaultSecretResolver)?;
    let server: ServerConfig = config.section()?;
    let state = AppState::from_config(&config, Arc::new(InMemoryStore::new()))?;

    let addr = server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, profile = config.profile(), "shelter api listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shelter api stopped");
    Ok(())
}
