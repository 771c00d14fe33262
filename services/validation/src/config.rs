//! Validation worker configuration.

use entitle_runtime::{AmqpConfig, CacheTtlConfig, RedisConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub log_level: String,
    pub redis: RedisConfig,
    pub amqp: AmqpConfig,
    pub cache_ttl: CacheTtlConfig,
    /// Base URL of the user-entitlement service.
    pub user_service_url: String,
    /// Base URL of the access-catalog service.
    pub access_catalog_url: String,
    /// Outbound HTTP timeout in seconds.
    pub http_timeout_secs: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            redis: RedisConfig::default(),
            amqp: AmqpConfig::default(),
            cache_ttl: CacheTtlConfig::default(),
            user_service_url: "http://localhost:8002".to_owned(),
            access_catalog_url: "http://localhost:8001".to_owned(),
            http_timeout_secs: 30,
        }
    }
}
