//! Access-catalog service binary.

mod api;
mod config;
mod domain;
mod infra;

use anyhow::Context;
use entitle_cache::CacheClient;
use tracing::info;

use crate::config::AccessCatalogConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: AccessCatalogConfig =
        entitle_runtime::config::load().context("loading access-catalog configuration")?;
    entitle_runtime::telemetry::init(&config.log_level);

    let db = infra::storage::connect(&config.database)
        .await
        .context("connecting to database")?;
    let cache = CacheClient::connect(&config.redis.connection_url())
        .await
        .context("connecting to cache")?;

    let state = api::rest::AppState::build(db.clone(), cache.clone(), &config);
    let app = api::rest::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(bind_addr = %config.bind_addr, "access-catalog listening");

    let shutdown = entitle_runtime::shutdown_token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("http server failed")?;

    cache.close();
    db.close().await.context("closing database")?;
    info!("access-catalog stopped");
    Ok(())
}
