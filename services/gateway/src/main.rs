//! Gateway service binary.

mod api;
mod config;

use anyhow::Context;
use tracing::info;

use crate::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: GatewayConfig =
        entitle_runtime::config::load().context("loading gateway configuration")?;
    entitle_runtime::telemetry::init(&config.log_level);

    let state = api::rest::AppState::build(&config).context("building downstream clients")?;
    let app = api::rest::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(bind_addr = %config.bind_addr, "gateway listening");

    let shutdown = entitle_runtime::shutdown_token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("http server failed")?;

    info!("gateway stopped");
    Ok(())
}
