//! Read-through JSON cache client.
//!
//! All entitle services cache read projections under well-known keys (see
//! [`keys`]) with a TTL and invalidate by point deletion after durable
//! writes. Cache failures are never allowed to fail a request: every
//! operation degrades to a miss (or a no-op) and logs at `warn`.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub mod keys;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection failed: {0}")]
    Connect(#[from] redis::RedisError),
}

/// Shared redis client. Cloning is cheap; the underlying connection manager
/// multiplexes and reconnects on its own.
#[derive(Clone)]
pub struct CacheClient {
    conn: ConnectionManager,
}

impl CacheClient {
    /// Connect to redis. Fails fast at startup when the cache is down.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    /// Fetch and decode a JSON value. A decode failure deletes the bad key
    /// before reporting a miss so the next read refills it.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(key).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(key, %error, "cache get failed");
                return None;
            }
        };
        let raw = raw?;

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(error) => {
                warn!(key, %error, "cache entry failed to decode, deleting");
                self.delete(&[key]).await;
                None
            }
        }
    }

    /// Serialize and store a value with a TTL in seconds.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(key, %error, "failed to serialize cache value");
                return;
            }
        };

        let mut conn = self.conn.clone();
        if let Err(error) = conn.set_ex::<_, _, ()>(key, raw, ttl_secs).await {
            warn!(key, %error, "cache set failed");
        } else {
            debug!(key, ttl_secs, "cache entry stored");
        }
    }

    /// Point-delete one or more keys. Used for invalidation after durable
    /// writes; deleting a missing key is not an error.
    pub async fn delete(&self, cache_keys: &[&str]) {
        if cache_keys.is_empty() {
            return;
        }
        let mut conn = self.conn.clone();
        if let Err(error) = conn.del::<_, ()>(cache_keys).await {
            warn!(keys = ?cache_keys, %error, "cache delete failed");
        } else {
            debug!(keys = ?cache_keys, "cache entries invalidated");
        }
    }

    /// Liveness probe for health endpoints.
    pub async fn ping(&self) -> bool {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .is_ok()
    }

    /// Release this handle. The underlying connection shuts down once the
    /// last clone is dropped; call this during teardown after the broker
    /// closes and before the durable store does.
    pub fn close(self) {
        drop(self.conn);
        debug!("cache client closed");
    }
}
