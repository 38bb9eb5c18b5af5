use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::RetryConfig;
use database::postgres::{close, connect_from_config_with_retry, run_migrations};
use domain_products::InMemoryProductRepository;
use tracing::{info, warn};

mod api;
mod app;
mod config;
mod openapi;
mod state;

use config::Config;
use state::{AppState, ProductStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    let store = match &config.database {
        Some(db_config) => {
            info!("Connecting to PostgreSQL at {}", db_config.redacted_url());
            let db = connect_from_config_with_retry(db_config.clone(), RetryConfig::default()).await?;
            run_migrations::<migration::Migrator>(&db, "catalog").await?;
            ProductStore::Postgres(db)
        }
        None => {
            warn!("Using the in-memory product store; data is lost on restart");
            ProductStore::Memory(InMemoryProductRepository::new())
        }
    };

    let state = AppState { config, store };
    let app = app::build_app(&state)?;

    info!(
        store = %state.config.store,
        "Starting Catalog API on {}",
        state.config.server.address()
    );

    let AppState { config, store } = state;
    create_production_app(app, &config.server, async move {
        if let ProductStore::Postgres(db) = store {
            info!("Shutting down: closing PostgreSQL connections");
            close(db).await;
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
