//! Read-through cached clients for the catalog and entitlement services.
//!
//! The worker mirrors the same cache keys the owning services invalidate,
//! so it tolerates at most one TTL of staleness and never invalidates
//! anything itself.

use access_catalog_sdk::{AccessCatalogClient, ConflictPair, GroupRef};
use async_trait::async_trait;
use entitle_cache::{keys, CacheClient};
use entitle_runtime::CacheTtlConfig;
use user_entitlement_sdk::{ActiveGroup, UserEntitlementClient};

use crate::ports::{ActiveGroupsProvider, CatalogProvider, FetchError};

pub struct CachedUserClient {
    client: UserEntitlementClient,
    cache: CacheClient,
    ttl_secs: u64,
}

impl CachedUserClient {
    #[must_use]
    pub fn new(client: UserEntitlementClient, cache: CacheClient, ttl: &CacheTtlConfig) -> Self {
        Self {
            client,
            cache,
            ttl_secs: ttl.user_active_groups_secs,
        }
    }
}

#[async_trait]
impl ActiveGroupsProvider for CachedUserClient {
    async fn active_group_ids(&self, user_id: i32) -> Result<Vec<i32>, FetchError> {
        let key = keys::user_active_groups(user_id);
        if let Some(groups) = self.cache.get_json::<Vec<ActiveGroup>>(&key).await {
            return Ok(groups.into_iter().map(|group| group.id).collect());
        }

        let response = self
            .client
            .get_current_active_groups(user_id)
            .await
            .map_err(|error| FetchError(error.to_string()))?;

        self.cache
            .set_json(&key, &response.groups, self.ttl_secs)
            .await;
        Ok(response.groups.into_iter().map(|group| group.id).collect())
    }
}

pub struct CachedCatalogClient {
    client: AccessCatalogClient,
    cache: CacheClient,
    matrix_ttl_secs: u64,
    access_groups_ttl_secs: u64,
}

impl CachedCatalogClient {
    #[must_use]
    pub fn new(client: AccessCatalogClient, cache: CacheClient, ttl: &CacheTtlConfig) -> Self {
        Self {
            client,
            cache,
            matrix_ttl_secs: ttl.conflicts_matrix_secs,
            access_groups_ttl_secs: ttl.access_groups_secs,
        }
    }
}

#[async_trait]
impl CatalogProvider for CachedCatalogClient {
    async fn conflict_pairs(&self) -> Result<Vec<ConflictPair>, FetchError> {
        if let Some(pairs) = self
            .cache
            .get_json::<Vec<ConflictPair>>(keys::CONFLICTS_MATRIX)
            .await
        {
            return Ok(pairs);
        }

        let response = self
            .client
            .get_conflicts()
            .await
            .map_err(|error| FetchError(error.to_string()))?;

        self.cache
            .set_json(keys::CONFLICTS_MATRIX, &response.conflicts, self.matrix_ttl_secs)
            .await;
        Ok(response.conflicts)
    }

    async fn access_group_ids(&self, access_id: i32) -> Result<Vec<i32>, FetchError> {
        let key = keys::access_groups(access_id);
        if let Some(groups) = self.cache.get_json::<Vec<GroupRef>>(&key).await {
            return Ok(groups.into_iter().map(|group| group.id).collect());
        }

        let response = self
            .client
            .get_access_groups(access_id)
            .await
            .map_err(|error| FetchError(error.to_string()))?;

        self.cache
            .set_json(&key, &response.groups, self.access_groups_ttl_secs)
            .await;
        Ok(response.groups.into_iter().map(|group| group.id).collect())
    }
}
