//! Gateway configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub bind_addr: String,
    pub log_level: String,
    /// Base URL of the user-entitlement service.
    pub user_service_url: String,
    /// Base URL of the access-catalog service.
    pub access_catalog_url: String,
    /// Outbound HTTP timeout in seconds.
    pub http_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_owned(),
            log_level: "info".to_owned(),
            user_service_url: "http://localhost:8002".to_owned(),
            access_catalog_url: "http://localhost:8001".to_owned(),
            http_timeout_secs: 30,
        }
    }
}
