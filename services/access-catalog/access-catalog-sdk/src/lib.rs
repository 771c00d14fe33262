//! Public contract of the access-catalog service.
//!
//! Wire models plus a typed HTTP client. The validation worker and the
//! gateway consume the catalog exclusively through this crate.

mod client;
mod models;

pub use client::{AccessCatalogClient, CatalogClientError};
pub use models::{
    Access, AccessGroupsResponse, AddAccessToGroupResponse, AddResourceToAccessRequest,
    ConflictPair, ConflictsResponse, CreateAccessRequest, CreateConflictRequest,
    CreateGroupRequest, CreateResourceRequest, DeleteConflictRequest, Group, GroupAccessesResponse,
    GroupRef, Resource, ResourceType,
};
