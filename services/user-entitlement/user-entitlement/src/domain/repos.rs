//! Repository traits for entitlement persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use user_entitlement_sdk::{EntitlementStatus, PermissionKind, UserDto};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Entitlement;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: i32) -> Result<Option<UserDto>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserDto>, DomainError>;

    async fn insert(&self, username: &str) -> Result<UserDto, DomainError>;
}

#[async_trait]
pub trait EntitlementRepository: Send + Sync {
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Entitlement>, DomainError>;

    async fn find_by_triple(
        &self,
        user_id: i32,
        kind: PermissionKind,
        item_id: i32,
    ) -> Result<Option<Entitlement>, DomainError>;

    async fn find_by_request_id(&self, request_id: Uuid)
        -> Result<Option<Entitlement>, DomainError>;

    /// Rows with `kind = group` and `status = active`.
    async fn find_active_groups(&self, user_id: i32) -> Result<Vec<Entitlement>, DomainError>;

    async fn insert_pending(
        &self,
        user_id: i32,
        kind: PermissionKind,
        item_id: i32,
        item_name: Option<&str>,
        request_id: Uuid,
    ) -> Result<Entitlement, DomainError>;

    /// Flip a `revoked`/`rejected` row back to `pending` with a fresh
    /// request id and a cleared `assigned_at`. Guarded by the current
    /// status; `false` when the row was no longer re-requestable.
    async fn reset_to_pending(&self, id: i32, request_id: Uuid) -> Result<bool, DomainError>;

    /// Set the status, optionally stamping `assigned_at` (`None` leaves the
    /// timestamp untouched). `false` when the row vanished.
    async fn set_status(
        &self,
        id: i32,
        status: EntitlementStatus,
        assigned_at: Option<DateTime<Utc>>,
    ) -> Result<bool, DomainError>;
}
