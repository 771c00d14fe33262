//! Outbound ports of the entitlement domain.

use async_trait::async_trait;
use thiserror::Error;
use user_entitlement_sdk::{ActiveGroup, ValidationJob};

/// Publishing a validation job is best-effort after the durable commit; the
/// caller logs failures and leaves the request `pending`.
#[derive(Debug, Error)]
#[error("validation job publish failed: {0}")]
pub struct PublishError(pub String);

#[async_trait]
pub trait ValidationJobPort: Send + Sync {
    async fn publish(&self, job: &ValidationJob) -> Result<(), PublishError>;
}

/// Per-user active-groups projection cache.
#[async_trait]
pub trait ActiveGroupsCache: Send + Sync {
    async fn get(&self, user_id: i32) -> Option<Vec<ActiveGroup>>;
    async fn set(&self, user_id: i32, groups: &[ActiveGroup]);
    async fn invalidate(&self, user_id: i32);
}
