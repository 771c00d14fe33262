use std::sync::Arc;

use access_catalog_sdk::{Access, Group};
use tracing::{debug, info, instrument};

use crate::domain::error::{validate_name, DomainError};
use crate::domain::ports::{AccessGroupsCache, GroupAccessesCache};
use crate::domain::repos::{AccessRepository, ConflictRepository, GroupRepository};

pub struct GroupService<G, A, C>
where
    G: GroupRepository,
    A: AccessRepository,
    C: ConflictRepository,
{
    repo: Arc<G>,
    accesses: Arc<A>,
    conflicts: Arc<C>,
    group_accesses_cache: Arc<dyn GroupAccessesCache>,
    access_groups_cache: Arc<dyn AccessGroupsCache>,
}

impl<G, A, C> GroupService<G, A, C>
where
    G: GroupRepository,
    A: AccessRepository,
    C: ConflictRepository,
{
    pub fn new(
        repo: Arc<G>,
        accesses: Arc<A>,
        conflicts: Arc<C>,
        group_accesses_cache: Arc<dyn GroupAccessesCache>,
        access_groups_cache: Arc<dyn AccessGroupsCache>,
    ) -> Self {
        Self {
            repo,
            accesses,
            conflicts,
            group_accesses_cache,
            access_groups_cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_groups(&self) -> Result<Vec<Group>, DomainError> {
        self.repo.list().await
    }

    #[instrument(skip(self), fields(group_id = %id))]
    pub async fn get_group(&self, id: i32) -> Result<Group, DomainError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("group", id))
    }

    /// Group names are unique across the catalog.
    #[instrument(skip(self))]
    pub async fn create_group(&self, name: &str, access_ids: &[i32]) -> Result<Group, DomainError> {
        validate_name("name", name)?;

        if self.repo.find_by_name(name).await?.is_some() {
            return Err(DomainError::GroupNameTaken {
                name: name.to_owned(),
            });
        }

        for access_id in access_ids {
            self.accesses
                .get(*access_id)
                .await?
                .ok_or_else(|| DomainError::not_found("access", *access_id))?;
        }

        let group = self.repo.insert(name, access_ids).await?;
        info!(group_id = group.id, "group created");
        Ok(group)
    }

    /// A group participating in any conflict edge cannot be deleted.
    #[instrument(skip(self), fields(group_id = %id))]
    pub async fn delete_group(&self, id: i32) -> Result<(), DomainError> {
        if self.conflicts.group_has_conflicts(id).await? {
            return Err(DomainError::referenced_by("group", id, "conflicts"));
        }

        if !self.repo.delete(id).await? {
            return Err(DomainError::not_found("group", id));
        }

        self.group_accesses_cache.invalidate(id).await;
        debug!("group deleted");
        Ok(())
    }

    /// Accesses granted by the group; read through the cache.
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn get_group_accesses(&self, group_id: i32) -> Result<Vec<Access>, DomainError> {
        self.get_group(group_id).await?;

        if let Some(accesses) = self.group_accesses_cache.get(group_id).await {
            return Ok(accesses);
        }

        let accesses = self.repo.accesses_of(group_id).await?;
        self.group_accesses_cache.set(group_id, &accesses).await;
        Ok(accesses)
    }

    #[instrument(skip(self), fields(group_id = %group_id, access_id = %access_id))]
    pub async fn add_access(&self, group_id: i32, access_id: i32) -> Result<(), DomainError> {
        self.get_group(group_id).await?;
        self.accesses
            .get(access_id)
            .await?
            .ok_or_else(|| DomainError::not_found("access", access_id))?;

        self.repo.add_access(group_id, access_id).await?;

        self.group_accesses_cache.invalidate(group_id).await;
        self.access_groups_cache.invalidate(access_id).await;
        info!("access attached to group");
        Ok(())
    }

    #[instrument(skip(self), fields(group_id = %group_id, access_id = %access_id))]
    pub async fn remove_access(&self, group_id: i32, access_id: i32) -> Result<(), DomainError> {
        self.get_group(group_id).await?;

        if !self.repo.remove_access(group_id, access_id).await? {
            return Err(DomainError::not_found("access", access_id));
        }

        self.group_accesses_cache.invalidate(group_id).await;
        self.access_groups_cache.invalidate(access_id).await;
        info!("access detached from group");
        Ok(())
    }
}
