//! Repository traits for catalog persistence.
//!
//! Implementations own their connection; operations touching more than one
//! row (conflict pairs, membership changes) are atomic inside the
//! repository.

use access_catalog_sdk::{Access, ConflictPair, Group, GroupRef, Resource, ResourceType};
use async_trait::async_trait;

use crate::domain::error::DomainError;

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Resource>, DomainError>;

    async fn get(&self, id: i32) -> Result<Option<Resource>, DomainError>;

    /// All of `ids` must exist; returns the missing id otherwise.
    async fn require_all(&self, ids: &[i32]) -> Result<Vec<Resource>, DomainError>;

    async fn insert(
        &self,
        name: &str,
        resource_type: ResourceType,
        description: Option<&str>,
    ) -> Result<Resource, DomainError>;

    /// Whether any access references the resource.
    async fn is_referenced(&self, id: i32) -> Result<bool, DomainError>;

    /// Returns `false` when no row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait AccessRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Access>, DomainError>;

    /// Access with its resources expanded.
    async fn get(&self, id: i32) -> Result<Option<Access>, DomainError>;

    async fn insert(&self, name: &str, resource_ids: &[i32]) -> Result<Access, DomainError>;

    /// Whether any group references the access.
    async fn is_referenced(&self, id: i32) -> Result<bool, DomainError>;

    async fn delete(&self, id: i32) -> Result<bool, DomainError>;

    /// Attach a resource; `false` when the link already existed.
    async fn add_resource(&self, access_id: i32, resource_id: i32) -> Result<bool, DomainError>;

    /// Detach a resource; `false` when the link did not exist.
    async fn remove_resource(&self, access_id: i32, resource_id: i32)
        -> Result<bool, DomainError>;

    /// Groups containing the access.
    async fn groups_containing(&self, access_id: i32) -> Result<Vec<GroupRef>, DomainError>;
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Group>, DomainError>;

    async fn get(&self, id: i32) -> Result<Option<Group>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<GroupRef>, DomainError>;

    async fn insert(&self, name: &str, access_ids: &[i32]) -> Result<Group, DomainError>;

    async fn delete(&self, id: i32) -> Result<bool, DomainError>;

    /// Accesses granted by the group, resources expanded.
    async fn accesses_of(&self, group_id: i32) -> Result<Vec<Access>, DomainError>;

    /// Attach an access; `false` when the link already existed.
    async fn add_access(&self, group_id: i32, access_id: i32) -> Result<bool, DomainError>;

    /// Detach an access; `false` when the link did not exist.
    async fn remove_access(&self, group_id: i32, access_id: i32) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait ConflictRepository: Send + Sync {
    /// Every stored edge, both directions, ordered deterministically.
    async fn all(&self) -> Result<Vec<ConflictPair>, DomainError>;

    async fn exists(&self, group_id1: i32, group_id2: i32) -> Result<bool, DomainError>;

    /// Insert both directional rows atomically.
    async fn create_pair(&self, group_id1: i32, group_id2: i32) -> Result<(), DomainError>;

    /// Delete both directional rows atomically; `false` when neither existed.
    async fn delete_pair(&self, group_id1: i32, group_id2: i32) -> Result<bool, DomainError>;

    /// Whether the group participates in any conflict edge.
    async fn group_has_conflicts(&self, group_id: i32) -> Result<bool, DomainError>;
}
