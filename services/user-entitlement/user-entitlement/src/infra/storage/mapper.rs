//! Entity to domain conversions.

use user_entitlement_sdk::{EntitlementStatus, PermissionKind, UserDto};

use super::entity;
use crate::domain::error::DomainError;
use crate::domain::model::Entitlement;

pub fn kind_to_db(kind: PermissionKind) -> &'static str {
    kind.as_str()
}

pub fn kind_from_db(raw: &str) -> Result<PermissionKind, DomainError> {
    match raw {
        "access" => Ok(PermissionKind::Access),
        "group" => Ok(PermissionKind::Group),
        other => Err(DomainError::validation(
            "permission_type",
            format!("unknown permission type '{other}' in store"),
        )),
    }
}

pub fn status_to_db(status: EntitlementStatus) -> &'static str {
    status.as_str()
}

pub fn status_from_db(raw: &str) -> Result<EntitlementStatus, DomainError> {
    match raw {
        "pending" => Ok(EntitlementStatus::Pending),
        "active" => Ok(EntitlementStatus::Active),
        "revoked" => Ok(EntitlementStatus::Revoked),
        "rejected" => Ok(EntitlementStatus::Rejected),
        other => Err(DomainError::validation(
            "status",
            format!("unknown status '{other}' in store"),
        )),
    }
}

pub fn permission_to_model(row: entity::user_permission::Model) -> Result<Entitlement, DomainError> {
    Ok(Entitlement {
        id: row.id,
        user_id: row.user_id,
        kind: kind_from_db(&row.permission_type)?,
        item_id: row.item_id,
        item_name: row.item_name,
        status: status_from_db(&row.status)?,
        request_id: row.request_id,
        assigned_at: row.assigned_at,
    })
}

pub fn user_to_model(row: entity::user::Model) -> UserDto {
    UserDto {
        id: row.id,
        username: row.username,
    }
}
