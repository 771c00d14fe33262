//! Entity to wire-model conversions.

use access_catalog_sdk::{ConflictPair, Group, GroupRef, Resource, ResourceType};

use super::entity;
use crate::domain::error::DomainError;

pub fn resource_type_to_db(resource_type: ResourceType) -> &'static str {
    match resource_type {
        ResourceType::Api => "API",
        ResourceType::Database => "Database",
        ResourceType::Service => "Service",
    }
}

pub fn resource_type_from_db(raw: &str) -> Result<ResourceType, DomainError> {
    match raw {
        "API" => Ok(ResourceType::Api),
        "Database" => Ok(ResourceType::Database),
        "Service" => Ok(ResourceType::Service),
        other => Err(DomainError::validation(
            "type",
            format!("unknown resource type '{other}' in store"),
        )),
    }
}

pub fn resource_to_model(row: entity::resource::Model) -> Result<Resource, DomainError> {
    Ok(Resource {
        id: row.id,
        name: row.name,
        resource_type: resource_type_from_db(&row.resource_type)?,
        description: row.description,
    })
}

pub fn group_to_ref(row: entity::group::Model) -> GroupRef {
    GroupRef {
        id: row.id,
        name: row.name,
    }
}

pub fn group_to_model(row: entity::group::Model, accesses: Vec<access_catalog_sdk::Access>) -> Group {
    Group {
        id: row.id,
        name: row.name,
        accesses,
    }
}

pub fn conflict_to_pair(row: entity::conflict::Model) -> ConflictPair {
    ConflictPair {
        group_id1: row.group_id1,
        group_id2: row.group_id2,
    }
}
