use std::sync::Arc;

use access_catalog_sdk::{Resource, ResourceType};
use tracing::{debug, info, instrument};

use crate::domain::error::{validate_name, DomainError};
use crate::domain::repos::ResourceRepository;

pub struct ResourceService<R: ResourceRepository> {
    repo: Arc<R>,
}

impl<R: ResourceRepository> ResourceService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list_resources(&self) -> Result<Vec<Resource>, DomainError> {
        self.repo.list().await
    }

    #[instrument(skip(self), fields(resource_id = %id))]
    pub async fn get_resource(&self, id: i32) -> Result<Resource, DomainError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("resource", id))
    }

    #[instrument(skip(self, description))]
    pub async fn create_resource(
        &self,
        name: &str,
        resource_type: ResourceType,
        description: Option<&str>,
    ) -> Result<Resource, DomainError> {
        validate_name("name", name)?;

        let resource = self.repo.insert(name, resource_type, description).await?;
        info!(resource_id = resource.id, "resource created");
        Ok(resource)
    }

    /// A resource referenced by any access cannot be deleted.
    #[instrument(skip(self), fields(resource_id = %id))]
    pub async fn delete_resource(&self, id: i32) -> Result<(), DomainError> {
        if self.repo.is_referenced(id).await? {
            return Err(DomainError::referenced_by("resource", id, "accesses"));
        }

        if !self.repo.delete(id).await? {
            return Err(DomainError::not_found("resource", id));
        }

        debug!("resource deleted");
        Ok(())
    }
}
