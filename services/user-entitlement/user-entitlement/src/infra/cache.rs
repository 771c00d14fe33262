//! Redis-backed implementation of the active-groups cache port.

use async_trait::async_trait;
use entitle_cache::{keys, CacheClient};
use entitle_runtime::CacheTtlConfig;
use user_entitlement_sdk::ActiveGroup;

use crate::domain::ports::ActiveGroupsCache;

pub struct RedisActiveGroupsCache {
    cache: CacheClient,
    ttl_secs: u64,
}

impl RedisActiveGroupsCache {
    #[must_use]
    pub fn new(cache: CacheClient, ttl: &CacheTtlConfig) -> Self {
        Self {
            cache,
            ttl_secs: ttl.user_active_groups_secs,
        }
    }
}

#[async_trait]
impl ActiveGroupsCache for RedisActiveGroupsCache {
    async fn get(&self, user_id: i32) -> Option<Vec<ActiveGroup>> {
        self.cache.get_json(&keys::user_active_groups(user_id)).await
    }

    async fn set(&self, user_id: i32, groups: &[ActiveGroup]) {
        self.cache
            .set_json(&keys::user_active_groups(user_id), &groups, self.ttl_secs)
            .await;
    }

    async fn invalidate(&self, user_id: i32) {
        self.cache
            .delete(&[&keys::user_active_groups(user_id)])
            .await;
    }
}
