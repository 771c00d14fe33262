//! User-entitlement service configuration.

use entitle_runtime::{AmqpConfig, CacheTtlConfig, DatabaseConfig, RedisConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEntitlementConfig {
    pub bind_addr: String,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub amqp: AmqpConfig,
    pub cache_ttl: CacheTtlConfig,
}

impl Default for UserEntitlementConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8002".to_owned(),
            log_level: "info".to_owned(),
            database: DatabaseConfig::default(),
            redis: RedisConfig::default(),
            amqp: AmqpConfig::default(),
            cache_ttl: CacheTtlConfig::default(),
        }
    }
}
