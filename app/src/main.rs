use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reelfinder::appwrite::{AppwriteClient, CounterStore, DisabledCounterStore};
use reelfinder::config::Config;
use reelfinder::orchestrator::CatalogService;
use reelfinder::session::SearchController;
use reelfinder::tmdb::{CatalogApi, TmdbClient};
use reelfinder::{build_router, onboarding, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting ReelFinder...");

    onboarding::maybe_run_onboarding()?;

    let config = Config::new()?;
    info!("Configuration loaded");

    let catalog: Arc<dyn CatalogApi> =
        Arc::new(TmdbClient::with_base_url(&config.tmdb_api_key, &config.tmdb_base_url)?);
    info!("TMDB client initialized");

    let counter: Arc<dyn CounterStore> = match config.appwrite.clone() {
        Some(appwrite) => {
            info!("Search counters stored in Appwrite collection {}", appwrite.collection_id);
            Arc::new(AppwriteClient::new(appwrite)?)
        }
        None => {
            warn!("Appwrite is not configured; trending searches are disabled");
            Arc::new(DisabledCounterStore)
        }
    };

    let search = SearchController::start(
        CatalogService::new(catalog, counter),
        Duration::from_millis(config.debounce_ms),
    );

    // Initial listings and the one-time trending load run alongside startup.
    {
        let search = Arc::clone(&search);
        tokio::spawn(async move { search.search("").await });
    }
    {
        let search = Arc::clone(&search);
        let limit = config.trending_limit;
        tokio::spawn(async move { search.refresh_trending(limit).await });
    }

    let app = build_router(AppState { search });

    let addr: SocketAddr = format!("127.0.0.1:{}", config.port).parse()?;
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
