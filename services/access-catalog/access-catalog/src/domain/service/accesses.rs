use std::sync::Arc;

use access_catalog_sdk::{Access, GroupRef};
use tracing::{debug, info, instrument};

use crate::domain::error::{validate_name, DomainError};
use crate::domain::ports::AccessGroupsCache;
use crate::domain::repos::{AccessRepository, ResourceRepository};

pub struct AccessService<A: AccessRepository, R: ResourceRepository> {
    repo: Arc<A>,
    resources: Arc<R>,
    access_groups_cache: Arc<dyn AccessGroupsCache>,
}

impl<A: AccessRepository, R: ResourceRepository> AccessService<A, R> {
    pub fn new(
        repo: Arc<A>,
        resources: Arc<R>,
        access_groups_cache: Arc<dyn AccessGroupsCache>,
    ) -> Self {
        Self {
            repo,
            resources,
            access_groups_cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_accesses(&self) -> Result<Vec<Access>, DomainError> {
        self.repo.list().await
    }

    #[instrument(skip(self), fields(access_id = %id))]
    pub async fn get_access(&self, id: i32) -> Result<Access, DomainError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("access", id))
    }

    #[instrument(skip(self))]
    pub async fn create_access(
        &self,
        name: &str,
        resource_ids: &[i32],
    ) -> Result<Access, DomainError> {
        validate_name("name", name)?;
        self.resources.require_all(resource_ids).await?;

        let access = self.repo.insert(name, resource_ids).await?;
        info!(access_id = access.id, "access created");
        Ok(access)
    }

    /// An access referenced by any group cannot be deleted.
    #[instrument(skip(self), fields(access_id = %id))]
    pub async fn delete_access(&self, id: i32) -> Result<(), DomainError> {
        if self.repo.is_referenced(id).await? {
            return Err(DomainError::referenced_by("access", id, "groups"));
        }

        if !self.repo.delete(id).await? {
            return Err(DomainError::not_found("access", id));
        }

        self.access_groups_cache.invalidate(id).await;
        debug!("access deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(access_id = %access_id, resource_id = %resource_id))]
    pub async fn add_resource(&self, access_id: i32, resource_id: i32) -> Result<(), DomainError> {
        self.get_access(access_id).await?;
        self.resources
            .get(resource_id)
            .await?
            .ok_or_else(|| DomainError::not_found("resource", resource_id))?;

        self.repo.add_resource(access_id, resource_id).await?;
        self.access_groups_cache.invalidate(access_id).await;
        info!("resource attached to access");
        Ok(())
    }

    #[instrument(skip(self), fields(access_id = %access_id, resource_id = %resource_id))]
    pub async fn remove_resource(
        &self,
        access_id: i32,
        resource_id: i32,
    ) -> Result<(), DomainError> {
        self.get_access(access_id).await?;

        if !self.repo.remove_resource(access_id, resource_id).await? {
            return Err(DomainError::not_found("resource", resource_id));
        }

        self.access_groups_cache.invalidate(access_id).await;
        info!("resource detached from access");
        Ok(())
    }

    /// Groups containing the access; read through the cache.
    #[instrument(skip(self), fields(access_id = %access_id))]
    pub async fn get_access_groups(&self, access_id: i32) -> Result<Vec<GroupRef>, DomainError> {
        self.get_access(access_id).await?;

        if let Some(groups) = self.access_groups_cache.get(access_id).await {
            return Ok(groups);
        }

        let groups = self.repo.groups_containing(access_id).await?;
        self.access_groups_cache.set(access_id, &groups).await;
        Ok(groups)
    }
}
