pub mod api;
pub mod config;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use crate::config::{AppConfig, StorageBackend};
use std::sync::Arc;

/// Connect the configured store and serve the API until the listener fails
pub async fn start(config: AppConfig) -> anyhow::Result<()> {
    match config.database.backend {
        StorageBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let postgres_store =
                PostgresStore::new(&config.database_url(), config.max_connections()).await?;

            log::info!("Running database migrations...");
            postgres_store.migrate().await?;

            serve(Arc::new(postgres_store), &config).await
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory store; data is lost on shutdown");
            serve(Arc::new(MemoryStore::new()), &config).await
        }
    }
}

async fn serve<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    use tokio::net::TcpListener;

    let app = api::routes::create_router::<S>(&config.static_dir).with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Wishlist service running on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
