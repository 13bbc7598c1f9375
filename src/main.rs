use anyhow::Result;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use linkbox::config::{Config, StorageBackend};
use linkbox::storage::{MemoryStorage, SqliteStorage, Storage};
use linkbox::store::LinkStore;
use linkbox::{api, redirect};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    info!("Loaded configuration");

    let backend: Arc<dyn Storage> = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage (volatile)");
            Arc::new(MemoryStorage::new())
        }
        StorageBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.storage.url);
            Arc::new(SqliteStorage::new(&config.storage.url, config.storage.max_connections).await?)
        }
    };

    backend.init().await?;
    info!("Storage initialized");

    let store = Arc::new(LinkStore::new(backend));

    let mut app = api::create_api_router(Arc::clone(&store), config.public_base_url.clone())
        .merge(redirect::create_redirect_router(Arc::clone(&store)));

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("Serving dashboard from directory: {}", static_dir);
        app = app.nest_service("/dashboard", ServeDir::new(static_dir));
    }

    let app = app.layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
