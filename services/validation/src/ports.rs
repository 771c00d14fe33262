//! Data-fetch ports of the validation engine.
//!
//! A fetch failure is not retried inside one message: the engine turns it
//! into a rejection with an explanatory reason so the request leaves
//! `pending`, and at-least-once delivery stays intact.

use access_catalog_sdk::ConflictPair;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct FetchError(pub String);

#[async_trait]
pub trait ActiveGroupsProvider: Send + Sync {
    /// Ids of the groups the user currently holds as active.
    async fn active_group_ids(&self, user_id: i32) -> Result<Vec<i32>, FetchError>;
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// The full conflict matrix, both directions of every pair.
    async fn conflict_pairs(&self) -> Result<Vec<ConflictPair>, FetchError>;

    /// Ids of the groups containing an access.
    async fn access_group_ids(&self, access_id: i32) -> Result<Vec<i32>, FetchError>;
}
