//! User-entitlement service binary.
//!
//! Hosts the HTTP API and the result-queue consumer in one process. Startup
//! wires database, cache and broker; shutdown stops the consumer first,
//! then the broker, then the stores.

mod api;
mod config;
mod domain;
mod infra;

use std::sync::Arc;

use anyhow::Context;
use entitle_broker::{Broker, RESULT_QUEUE, VALIDATION_QUEUE};
use entitle_cache::CacheClient;
use tracing::{error, info};

use crate::config::UserEntitlementConfig;
use crate::infra::broker::{BrokerJobPublisher, ResultHandler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: UserEntitlementConfig =
        entitle_runtime::config::load().context("loading user-entitlement configuration")?;
    entitle_runtime::telemetry::init(&config.log_level);

    let db = infra::storage::connect(&config.database)
        .await
        .context("connecting to database")?;
    let cache = CacheClient::connect(&config.redis.connection_url())
        .await
        .context("connecting to cache")?;
    let broker = Arc::new(
        Broker::connect(&config.amqp.connection_url())
            .await
            .context("connecting to broker")?,
    );

    // One channel per logical role: the publisher never shares the
    // consumer's channel.
    let publisher = broker
        .publisher(VALIDATION_QUEUE)
        .await
        .context("opening validation publisher")?;
    let consumer = broker
        .consumer(RESULT_QUEUE, "user-entitlement-results")
        .await
        .context("opening result consumer")?;

    let state = api::rest::AppState::build(
        db.clone(),
        cache.clone(),
        broker.clone(),
        Arc::new(BrokerJobPublisher::new(publisher)),
        &config,
    );

    let shutdown = entitle_runtime::shutdown_token();

    let handler = ResultHandler::new(state.permissions.clone());
    let consumer_shutdown = shutdown.clone();
    let consumer_task = tokio::spawn(async move {
        if let Err(error) = consumer.run(&handler, consumer_shutdown).await {
            error!(%error, "result consumer terminated abnormally");
        }
    });

    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(bind_addr = %config.bind_addr, "user-entitlement listening");

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
        .await
        .context("http server failed")?;

    // Teardown: consumer first, then broker, then cache, then the store.
    shutdown.cancel();
    let _ = consumer_task.await;
    broker.close().await;
    cache.close();
    db.close().await.context("closing database")?;

    info!("user-entitlement stopped");
    Ok(())
}
