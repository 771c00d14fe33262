//! Public contract of the user-entitlement service.
//!
//! Wire models, the broker message schemas for the asynchronous validation
//! workflow, and a typed HTTP client used by the validation worker and the
//! gateway.

mod client;
mod messages;
mod models;

pub use client::{EntitlementClientError, UserEntitlementClient};
pub use messages::{ValidationJob, ValidationResult};
pub use models::{
    ActiveGroup, ActiveGroupsResponse, CreateRequestRequest, CreateRequestResponse,
    CreateUserRequest, EntitlementStatus, PermissionDto, PermissionKind, RevokePermissionRequest,
    RevokePermissionResponse, UserDto, UserPermissionsResponse,
};
