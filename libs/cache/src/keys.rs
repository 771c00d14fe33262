//! Well-known cache key builders.
//!
//! The catalog and entitlement services invalidate these keys on writes; the
//! validation worker reads through the same keys and never invalidates, so
//! the names must match exactly across services.

/// Full conflict matrix, both directions of every pair.
pub const CONFLICTS_MATRIX: &str = "conflicts:matrix";

/// Accesses granted by a group, with their resources.
#[must_use]
pub fn group_accesses(group_id: i32) -> String {
    format!("group:{group_id}:accesses")
}

/// Groups containing an access.
#[must_use]
pub fn access_groups(access_id: i32) -> String {
    format!("access:{access_id}:groups")
}

/// Groups a user currently holds as active.
#[must_use]
pub fn user_active_groups(user_id: i32) -> String {
    format!("user:{user_id}:active_groups")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats_are_stable() {
        assert_eq!(CONFLICTS_MATRIX, "conflicts:matrix");
        assert_eq!(group_accesses(7), "group:7:accesses");
        assert_eq!(access_groups(12), "access:12:groups");
        assert_eq!(user_active_groups(100), "user:100:active_groups");
    }
}
