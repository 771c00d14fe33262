//! Validation worker binary.
//!
//! Stateless: consumes `validation_queue` with `prefetch=1`, queries the
//! entitlement and catalog services through a read-through cache mirror,
//! and publishes each decision to `result_queue`. Scale horizontally by
//! running more processes.

mod clients;
mod config;
mod consumer;
mod engine;
mod ports;

use std::sync::Arc;
use std::time::Duration;

use access_catalog_sdk::AccessCatalogClient;
use anyhow::Context;
use entitle_broker::{Broker, RESULT_QUEUE, VALIDATION_QUEUE};
use entitle_cache::CacheClient;
use tracing::info;
use user_entitlement_sdk::UserEntitlementClient;

use crate::clients::{CachedCatalogClient, CachedUserClient};
use crate::config::ValidationConfig;
use crate::consumer::JobHandler;
use crate::engine::ValidationEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: ValidationConfig =
        entitle_runtime::config::load().context("loading validation configuration")?;
    entitle_runtime::telemetry::init(&config.log_level);

    let cache = CacheClient::connect(&config.redis.connection_url())
        .await
        .context("connecting to cache")?;

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let user_client = UserEntitlementClient::new(&config.user_service_url, timeout)
        .context("building user-entitlement client")?;
    let catalog_client = AccessCatalogClient::new(&config.access_catalog_url, timeout)
        .context("building access-catalog client")?;

    let engine = ValidationEngine::new(
        Arc::new(CachedUserClient::new(
            user_client,
            cache.clone(),
            &config.cache_ttl,
        )),
        Arc::new(CachedCatalogClient::new(
            catalog_client,
            cache.clone(),
            &config.cache_ttl,
        )),
    );

    let broker = Broker::connect(&config.amqp.connection_url())
        .await
        .context("connecting to broker")?;
    let results = broker
        .publisher(RESULT_QUEUE)
        .await
        .context("opening result publisher")?;
    let jobs = broker
        .consumer(VALIDATION_QUEUE, "validation-worker")
        .await
        .context("opening job consumer")?;

    info!("validation worker started");

    let shutdown = entitle_runtime::shutdown_token();
    let handler = JobHandler::new(engine, results);
    jobs.run(&handler, shutdown)
        .await
        .context("job consumer failed")?;

    broker.close().await;
    cache.close();
    info!("validation worker stopped");
    Ok(())
}
