//! Broker message schemas for the asynchronous validation workflow.
//!
//! Both messages travel as UTF-8 JSON with persistent delivery. The
//! `request_id` is the end-to-end idempotence key: the result consumer
//! tolerates duplicates and the validation worker may publish a result more
//! than once.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PermissionKind;

/// Published by the entitlement service after the pending row is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationJob {
    pub user_id: i32,
    pub permission_type: PermissionKind,
    pub item_id: i32,
    pub request_id: Uuid,
}

/// Published by the validation worker, one per consumed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub request_id: Uuid,
    pub approved: bool,
    pub user_id: i32,
    pub permission_type: PermissionKind,
    pub item_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_job_wire_format() {
        let job = ValidationJob {
            user_id: 100,
            permission_type: PermissionKind::Group,
            item_id: 1,
            request_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["user_id"], 100);
        assert_eq!(json["permission_type"], "group");
        assert_eq!(json["item_id"], 1);
        assert_eq!(json["request_id"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn validation_result_omits_absent_reason() {
        let result = ValidationResult {
            request_id: Uuid::nil(),
            approved: true,
            user_id: 100,
            permission_type: PermissionKind::Access,
            item_id: 7,
            reason: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("reason").is_none());
        assert_eq!(json["approved"], true);
    }

    #[test]
    fn validation_result_round_trips() {
        let result = ValidationResult {
            request_id: Uuid::new_v4(),
            approved: false,
            user_id: 5,
            permission_type: PermissionKind::Group,
            item_id: 2,
            reason: Some("user holds group 1, request implies group 2".to_owned()),
        };
        let raw = serde_json::to_vec(&result).unwrap();
        let back: ValidationResult = serde_json::from_slice(&raw).unwrap();
        assert_eq!(back, result);
    }
}
