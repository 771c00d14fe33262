use std::sync::Arc;

use access_catalog_sdk::ConflictPair;
use tracing::{info, instrument};

use crate::domain::error::DomainError;
use crate::domain::ports::ConflictMatrixCache;
use crate::domain::repos::{ConflictRepository, GroupRepository};

pub struct ConflictService<C: ConflictRepository, G: GroupRepository> {
    repo: Arc<C>,
    groups: Arc<G>,
    matrix_cache: Arc<dyn ConflictMatrixCache>,
}

impl<C: ConflictRepository, G: GroupRepository> ConflictService<C, G> {
    pub fn new(repo: Arc<C>, groups: Arc<G>, matrix_cache: Arc<dyn ConflictMatrixCache>) -> Self {
        Self {
            repo,
            groups,
            matrix_cache,
        }
    }

    /// The full matrix, both directions of every pair; read through the
    /// cache.
    #[instrument(skip(self))]
    pub async fn get_conflict_matrix(&self) -> Result<Vec<ConflictPair>, DomainError> {
        if let Some(pairs) = self.matrix_cache.get().await {
            return Ok(pairs);
        }

        let pairs = self.repo.all().await?;
        self.matrix_cache.set(&pairs).await;
        Ok(pairs)
    }

    /// Store the pair symmetrically: both `(a,b)` and `(b,a)` in one
    /// transaction.
    #[instrument(skip(self))]
    pub async fn create_conflict(
        &self,
        group_id1: i32,
        group_id2: i32,
    ) -> Result<ConflictPair, DomainError> {
        if group_id1 == group_id2 {
            return Err(DomainError::SelfConflict);
        }

        for group_id in [group_id1, group_id2] {
            self.groups
                .get(group_id)
                .await?
                .ok_or_else(|| DomainError::not_found("group", group_id))?;
        }

        if self.repo.exists(group_id1, group_id2).await? {
            return Err(DomainError::ConflictExists {
                group_id1,
                group_id2,
            });
        }

        self.repo.create_pair(group_id1, group_id2).await?;
        self.matrix_cache.invalidate().await;

        info!("conflict pair created");
        Ok(ConflictPair {
            group_id1,
            group_id2,
        })
    }

    /// Remove both directional rows; not-found only when neither existed.
    #[instrument(skip(self))]
    pub async fn delete_conflict(&self, group_id1: i32, group_id2: i32) -> Result<(), DomainError> {
        if !self.repo.delete_pair(group_id1, group_id2).await? {
            return Err(DomainError::ConflictNotFound {
                group_id1,
                group_id2,
            });
        }

        self.matrix_cache.invalidate().await;
        info!("conflict pair deleted");
        Ok(())
    }
}
