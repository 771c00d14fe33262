//! Shared runtime concerns for entitle services.
//!
//! Every service binary pulls its configuration, telemetry setup, HTTP
//! problem responses and shutdown signalling from here so the four services
//! stay uniform at the edges.

pub mod config;
pub mod problem;
pub mod shutdown;
pub mod telemetry;

pub use config::{AmqpConfig, CacheTtlConfig, ConfigError, DatabaseConfig, RedisConfig};
pub use problem::Problem;
pub use shutdown::shutdown_token;
