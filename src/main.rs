//! Product Cache - cache-aside product catalog service
//!
//! Startup wires the configured store and cache backends into a
//! `ProductService`, serves it over HTTP, and on shutdown releases the
//! cache client and the MongoDB client.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use product_cache::cache::{CacheClient, MokaCacheClient, RedisCacheClient};
use product_cache::config::{CacheBackend, StoreBackend};
use product_cache::database::{Database, MemoryProductStore, ProductStore};
use product_cache::{AppState, Config, ProductService, create_router};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("product_cache=info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting product cache service...");

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: store={:?}, cache={:?}, ttl={}s, port={}",
        config.store_backend, config.cache_backend, config.cache.ttl_secs, config.server_port
    );

    // Connect the document store
    let (store, database): (Arc<dyn ProductStore>, Option<Database>) = match config.store_backend {
        StoreBackend::MongoDb => {
            info!("Connecting to MongoDB...");
            let db = Database::connect(&config.mongodb_uri, &config.mongodb_database)
                .await
                .context("failed to connect to MongoDB")?;
            let repo = db
                .products(&config.mongodb_collection)
                .await
                .context("failed to prepare products collection")?;
            let store: Arc<dyn ProductStore> = Arc::new(repo);
            (store, Some(db))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory product store; data is lost on exit");
            let store: Arc<dyn ProductStore> = Arc::new(MemoryProductStore::new());
            (store, None)
        }
    };

    // Connect the cache
    let cache: Arc<dyn CacheClient> = match config.cache_backend {
        CacheBackend::Redis => {
            info!("Connecting to Redis at {}...", config.redis_url);
            let client = RedisCacheClient::connect(&config.redis_url)
                .await
                .context("failed to connect to Redis")?;
            Arc::new(client)
        }
        CacheBackend::Memory => {
            info!("Using in-process cache (capacity {})", config.cache.max_capacity);
            Arc::new(MokaCacheClient::new(config.cache.max_capacity))
        }
    };

    let service = Arc::new(ProductService::new(store, Arc::clone(&cache), &config.cache));
    let app = create_router(AppState::new(Arc::clone(&service)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Release backends whether or not the server exited cleanly
    if let Err(e) = cache.close().await {
        warn!("Failed to close cache client: {}", e);
    }
    if let Some(db) = database {
        db.shutdown().await;
    }

    info!("Final cache stats: {:?}", service.stats());
    served.context("server error")?;
    info!("Server shutdown complete");

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
