use std::sync::Arc;

use anyhow::Context;
use leafwatch_common::storage::{FilesystemImageStore, ImageStore};
use tracing::{Level, info, warn};

use leafwatch_server::config::AppConfig;
use leafwatch_server::gateway::InferenceGateway;
use leafwatch_server::state::AppState;
use leafwatch_server::store::database::DatabaseStore;
use leafwatch_server::store::memory::MemoryStore;
use leafwatch_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let images: Arc<dyn ImageStore> = Arc::new(
        FilesystemImageStore::new(&config.storage.images_dir, config.storage.max_image_size)
            .await
            .with_context(|| {
                format!(
                    "Failed to prepare image directory {}",
                    config.storage.images_dir.display()
                )
            })?,
    );
    let gateway =
        InferenceGateway::http(&config.inference).context("Failed to build inference client")?;

    let state = match config.database.url.clone() {
        Some(url) => {
            let db = database::init_db(&url)
                .await
                .context("Failed to connect to database")?;
            seed::ensure_indexes(&db).await?;
            info!("Using PostgreSQL record store");
            AppState::new(config, Arc::new(DatabaseStore::new(db)), images, gateway)
        }
        None => {
            warn!("No database URL configured; records are kept in memory only");
            AppState::new(config, Arc::new(MemoryStore::new()), images, gateway)
        }
    };

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
