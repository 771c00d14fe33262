//! Access-catalog service configuration.

use entitle_runtime::{CacheTtlConfig, DatabaseConfig, RedisConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessCatalogConfig {
    pub bind_addr: String,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub cache_ttl: CacheTtlConfig,
}

impl Default for AccessCatalogConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8001".to_owned(),
            log_level: "info".to_owned(),
            database: DatabaseConfig::default(),
            redis: RedisConfig::default(),
            cache_ttl: CacheTtlConfig::default(),
        }
    }
}
