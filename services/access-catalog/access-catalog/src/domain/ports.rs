//! Cache ports for the catalog read projections.
//!
//! The read path is try-cache, miss, load, set-with-TTL; writes invalidate
//! after the durable commit. Ports stay narrow so the domain services never
//! see cache keys or serialization.

use access_catalog_sdk::{Access, ConflictPair, GroupRef};
use async_trait::async_trait;

#[async_trait]
pub trait ConflictMatrixCache: Send + Sync {
    async fn get(&self) -> Option<Vec<ConflictPair>>;
    async fn set(&self, pairs: &[ConflictPair]);
    async fn invalidate(&self);
}

#[async_trait]
pub trait GroupAccessesCache: Send + Sync {
    async fn get(&self, group_id: i32) -> Option<Vec<Access>>;
    async fn set(&self, group_id: i32, accesses: &[Access]);
    async fn invalidate(&self, group_id: i32);
}

#[async_trait]
pub trait AccessGroupsCache: Send + Sync {
    async fn get(&self, access_id: i32) -> Option<Vec<GroupRef>>;
    async fn set(&self, access_id: i32, groups: &[GroupRef]);
    async fn invalidate(&self, access_id: i32);
}
