use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricehawk::config::AppConfig;
use pricehawk::scrapers::ScraperRegistry;
use pricehawk::store::{CatalogStore, SqliteStore};
use pricehawk::tracker::PriceTracker;
use pricehawk::web::{create_router, AppState, TokenVerifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricehawk=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let store: Arc<dyn CatalogStore> = Arc::new(
        SqliteStore::connect(&config.database)
            .await
            .context("failed to open database")?,
    );

    let registry = Arc::new(ScraperRegistry::new(config.scraper.clone()));
    let tracker = Arc::new(PriceTracker::new(
        Arc::clone(&store),
        registry,
        config.tracker.clone(),
    ));
    tracker.start().await;

    let state = AppState {
        store,
        tracker: Arc::clone(&tracker),
        auth: Arc::new(TokenVerifier::new(&config.security.secret_key)),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "pricehawk listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracker.stop().await;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
