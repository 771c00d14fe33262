use thiserror::Error;
use user_entitlement_sdk::PermissionKind;

/// Domain-specific errors for entitlement operations.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("user not found: {id}")]
    UserNotFound { id: i32 },

    #[error("user with username '{username}' already exists")]
    UsernameTaken { username: String },

    #[error("request for {kind:?} {item_id} is already pending or active for user {user_id}")]
    AlreadyRequested {
        user_id: i32,
        kind: PermissionKind,
        item_id: i32,
    },

    #[error("no active or pending {kind:?} {item_id} for user {user_id}")]
    PermissionNotFound {
        user_id: i32,
        kind: PermissionKind,
        item_id: i32,
    },

    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    pub fn user_not_found(id: i32) -> Self {
        Self::UserNotFound { id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
