//! Catalog wire models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ResourceType {
    #[serde(rename = "API")]
    Api,
    Database,
    Service,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Resource {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An access bundles resources; returned with its resources expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Access {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// Group reference without nested accesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroupRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Group {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub accesses: Vec<Access>,
}

/// One directed edge of the symmetric conflict matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConflictPair {
    pub group_id1: i32,
    pub group_id2: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConflictsResponse {
    pub conflicts: Vec<ConflictPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupAccessesResponse {
    pub group_id: i32,
    pub accesses: Vec<Access>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessGroupsResponse {
    pub access_id: i32,
    pub groups: Vec<GroupRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateResourceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAccessRequest {
    pub name: String,
    #[serde(default)]
    pub resource_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub access_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddResourceToAccessRequest {
    pub resource_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddAccessToGroupResponse {
    pub group_id: i32,
    pub access_id: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct CreateConflictRequest {
    pub group_id1: i32,
    pub group_id2: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct DeleteConflictRequest {
    pub group_id1: i32,
    pub group_id2: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_wire_values() {
        assert_eq!(
            serde_json::to_string(&ResourceType::Api).unwrap(),
            "\"API\""
        );
        assert_eq!(
            serde_json::to_string(&ResourceType::Database).unwrap(),
            "\"Database\""
        );
        assert_eq!(
            serde_json::to_string(&ResourceType::Service).unwrap(),
            "\"Service\""
        );
    }

    #[test]
    fn conflict_pair_uses_numbered_field_names() {
        let pair = ConflictPair {
            group_id1: 1,
            group_id2: 2,
        };
        let json = serde_json::to_value(pair).unwrap();
        assert_eq!(json["group_id1"], 1);
        assert_eq!(json["group_id2"], 2);
    }
}
