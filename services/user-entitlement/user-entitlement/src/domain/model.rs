//! Domain model of a user entitlement.

use chrono::{DateTime, Utc};
use user_entitlement_sdk::{EntitlementStatus, PermissionDto, PermissionKind};
use uuid::Uuid;

/// One entitlement row. At most one exists per `(user_id, kind, item_id)`;
/// `request_id` is globally unique and regenerated on every re-request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entitlement {
    pub id: i32,
    pub user_id: i32,
    pub kind: PermissionKind,
    pub item_id: i32,
    pub item_name: Option<String>,
    pub status: EntitlementStatus,
    pub request_id: Uuid,
    pub assigned_at: Option<DateTime<Utc>>,
}

impl From<Entitlement> for PermissionDto {
    fn from(entitlement: Entitlement) -> Self {
        Self {
            id: entitlement.id,
            permission_type: entitlement.kind,
            item_id: entitlement.item_id,
            item_name: entitlement.item_name,
            status: entitlement.status,
            assigned_at: entitlement.assigned_at,
        }
    }
}
