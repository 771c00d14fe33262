//! Redis-backed implementations of the catalog cache ports.

use access_catalog_sdk::{Access, ConflictPair, GroupRef};
use async_trait::async_trait;
use entitle_cache::{keys, CacheClient};
use entitle_runtime::CacheTtlConfig;

use crate::domain::ports::{AccessGroupsCache, ConflictMatrixCache, GroupAccessesCache};

pub struct RedisConflictMatrixCache {
    cache: CacheClient,
    ttl_secs: u64,
}

impl RedisConflictMatrixCache {
    #[must_use]
    pub fn new(cache: CacheClient, ttl: &CacheTtlConfig) -> Self {
        Self {
            cache,
            ttl_secs: ttl.conflicts_matrix_secs,
        }
    }
}

#[async_trait]
impl ConflictMatrixCache for RedisConflictMatrixCache {
    async fn get(&self) -> Option<Vec<ConflictPair>> {
        self.cache.get_json(keys::CONFLICTS_MATRIX).await
    }

    async fn set(&self, pairs: &[ConflictPair]) {
        self.cache
            .set_json(keys::CONFLICTS_MATRIX, &pairs, self.ttl_secs)
            .await;
    }

    async fn invalidate(&self) {
        self.cache.delete(&[keys::CONFLICTS_MATRIX]).await;
    }
}

pub struct RedisGroupAccessesCache {
    cache: CacheClient,
    ttl_secs: u64,
}

impl RedisGroupAccessesCache {
    #[must_use]
    pub fn new(cache: CacheClient, ttl: &CacheTtlConfig) -> Self {
        Self {
            cache,
            ttl_secs: ttl.group_accesses_secs,
        }
    }
}

#[async_trait]
impl GroupAccessesCache for RedisGroupAccessesCache {
    async fn get(&self, group_id: i32) -> Option<Vec<Access>> {
        self.cache.get_json(&keys::group_accesses(group_id)).await
    }

    async fn set(&self, group_id: i32, accesses: &[Access]) {
        self.cache
            .set_json(&keys::group_accesses(group_id), &accesses, self.ttl_secs)
            .await;
    }

    async fn invalidate(&self, group_id: i32) {
        self.cache.delete(&[&keys::group_accesses(group_id)]).await;
    }
}

pub struct RedisAccessGroupsCache {
    cache: CacheClient,
    ttl_secs: u64,
}

impl RedisAccessGroupsCache {
    #[must_use]
    pub fn new(cache: CacheClient, ttl: &CacheTtlConfig) -> Self {
        Self {
            cache,
            ttl_secs: ttl.access_groups_secs,
        }
    }
}

#[async_trait]
impl AccessGroupsCache for RedisAccessGroupsCache {
    async fn get(&self, access_id: i32) -> Option<Vec<GroupRef>> {
        self.cache.get_json(&keys::access_groups(access_id)).await
    }

    async fn set(&self, access_id: i32, groups: &[GroupRef]) {
        self.cache
            .set_json(&keys::access_groups(access_id), &groups, self.ttl_secs)
            .await;
    }

    async fn invalidate(&self, access_id: i32) {
        self.cache.delete(&[&keys::access_groups(access_id)]).await;
    }
}
