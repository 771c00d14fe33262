//! Entitlement wire models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// What an entitlement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Access,
    Group,
}

impl PermissionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Group => "group",
        }
    }
}

/// Lifecycle state of an entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementStatus {
    Pending,
    Active,
    Revoked,
    Rejected,
}

impl EntitlementStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Revoked => "revoked",
            Self::Rejected => "rejected",
        }
    }

    /// States that block a new request for the same entitlement.
    #[must_use]
    pub fn blocks_rerequest(self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRequestRequest {
    pub user_id: i32,
    pub permission_type: PermissionKind,
    pub item_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRequestResponse {
    pub status: String,
    pub request_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevokePermissionRequest {
    pub permission_type: PermissionKind,
    pub item_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevokePermissionResponse {
    pub status: String,
}

/// One entitlement row as seen by clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionDto {
    pub id: i32,
    pub permission_type: PermissionKind,
    pub item_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    pub status: EntitlementStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserPermissionsResponse {
    pub user_id: i32,
    pub groups: Vec<PermissionDto>,
    pub accesses: Vec<PermissionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActiveGroup {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActiveGroupsResponse {
    pub groups: Vec<ActiveGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
}
