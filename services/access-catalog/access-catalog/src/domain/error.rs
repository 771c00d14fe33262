use thiserror::Error;

/// Domain-specific errors for catalog operations.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i32 },

    #[error("group with name '{name}' already exists")]
    GroupNameTaken { name: String },

    #[error("{entity} {id} is referenced by {referenced_by} and cannot be deleted")]
    ReferencedBy {
        entity: &'static str,
        id: i32,
        referenced_by: &'static str,
    },

    #[error("a group cannot conflict with itself")]
    SelfConflict,

    #[error("conflict between groups {group_id1} and {group_id2} already exists")]
    ConflictExists { group_id1: i32, group_id2: i32 },

    #[error("no conflict between groups {group_id1} and {group_id2}")]
    ConflictNotFound { group_id1: i32, group_id2: i32 },

    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn referenced_by(entity: &'static str, id: i32, referenced_by: &'static str) -> Self {
        Self::ReferencedBy {
            entity,
            id,
            referenced_by,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate an entity name against the catalog length rule.
pub fn validate_name(field: &'static str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    if name.len() > 100 {
        return Err(DomainError::validation(
            field,
            "must be at most 100 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert!(validate_name("name", "Developers").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"x".repeat(101)).is_err());
        assert!(validate_name("name", &"x".repeat(100)).is_ok());
    }
}
