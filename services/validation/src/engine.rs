//! The conflict-of-interest decision.
//!
//! A request is approved iff no conflict edge connects a currently-held
//! group with a target group. The target set is the requested group itself,
//! or every group containing the requested access.

use std::collections::HashSet;
use std::sync::Arc;

use access_catalog_sdk::ConflictPair;
use tracing::{debug, instrument, warn};
use user_entitlement_sdk::{PermissionKind, ValidationJob, ValidationResult};

use crate::ports::{ActiveGroupsProvider, CatalogProvider, FetchError};

/// First conflict edge between a held group and a target group, reported as
/// `(held, target)`. Pairs are scanned in the order the catalog returns
/// them.
pub fn find_conflict(
    held: &[i32],
    target: &[i32],
    conflicts: &[ConflictPair],
) -> Option<(i32, i32)> {
    if held.is_empty() || target.is_empty() {
        return None;
    }

    let held: HashSet<i32> = held.iter().copied().collect();
    let target: HashSet<i32> = target.iter().copied().collect();

    for pair in conflicts {
        if held.contains(&pair.group_id1) && target.contains(&pair.group_id2) {
            return Some((pair.group_id1, pair.group_id2));
        }
        if held.contains(&pair.group_id2) && target.contains(&pair.group_id1) {
            return Some((pair.group_id2, pair.group_id1));
        }
    }
    None
}

pub struct ValidationEngine {
    users: Arc<dyn ActiveGroupsProvider>,
    catalog: Arc<dyn CatalogProvider>,
}

impl ValidationEngine {
    pub fn new(users: Arc<dyn ActiveGroupsProvider>, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { users, catalog }
    }

    /// Decide a validation job. Never fails: fetch errors become a
    /// rejection with an explanatory reason, so the result is always
    /// publishable.
    #[instrument(skip(self, job), fields(request_id = %job.request_id, user_id = %job.user_id))]
    pub async fn validate(&self, job: &ValidationJob) -> ValidationResult {
        match self.evaluate(job).await {
            Ok(result) => result,
            Err(error) => {
                warn!(%error, "data fetch failed, rejecting without retry");
                self.result(job, false, Some(format!("error fetching data: {error}")))
            }
        }
    }

    async fn evaluate(&self, job: &ValidationJob) -> Result<ValidationResult, FetchError> {
        let held = self.users.active_group_ids(job.user_id).await?;
        debug!(held = ?held, "fetched active groups");

        let target = match job.permission_type {
            PermissionKind::Group => vec![job.item_id],
            PermissionKind::Access => self.catalog.access_group_ids(job.item_id).await?,
        };
        debug!(target = ?target, "computed target group set");

        // An access granting no groups is an integrity signal, not a free
        // approval.
        if target.is_empty() {
            return Ok(self.result(
                job,
                false,
                Some(format!(
                    "no groups found for {} {}",
                    job.permission_type.as_str(),
                    job.item_id
                )),
            ));
        }

        let conflicts = self.catalog.conflict_pairs().await?;
        debug!(edges = conflicts.len(), "loaded conflict matrix");

        match find_conflict(&held, &target, &conflicts) {
            None => Ok(self.result(job, true, None)),
            Some((held_group, target_group)) => Ok(self.result(
                job,
                false,
                Some(format!(
                    "user holds group {held_group}, request implies group {target_group}"
                )),
            )),
        }
    }

    fn result(&self, job: &ValidationJob, approved: bool, reason: Option<String>) -> ValidationResult {
        ValidationResult {
            request_id: job.request_id,
            approved,
            user_id: job.user_id,
            permission_type: job.permission_type,
            item_id: job.item_id,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    fn pairs(edges: &[(i32, i32)]) -> Vec<ConflictPair> {
        // Symmetric storage: both directions for every edge, like the
        // catalog serves them.
        edges
            .iter()
            .flat_map(|&(a, b)| {
                [
                    ConflictPair {
                        group_id1: a,
                        group_id2: b,
                    },
                    ConflictPair {
                        group_id1: b,
                        group_id2: a,
                    },
                ]
            })
            .collect()
    }

    #[test]
    fn no_conflict_when_either_side_is_empty() {
        let conflicts = pairs(&[(1, 2)]);
        assert_eq!(find_conflict(&[], &[2], &conflicts), None);
        assert_eq!(find_conflict(&[1], &[], &conflicts), None);
    }

    #[test]
    fn detects_edge_between_held_and_target() {
        let conflicts = pairs(&[(1, 2)]);
        assert_eq!(find_conflict(&[1], &[2], &conflicts), Some((1, 2)));
        // Direction of holding flips the reported pair.
        assert_eq!(find_conflict(&[2], &[1], &conflicts), Some((2, 1)));
    }

    #[test]
    fn unrelated_edges_do_not_reject() {
        let conflicts = pairs(&[(3, 4)]);
        assert_eq!(find_conflict(&[1], &[2], &conflicts), None);
    }

    #[test]
    fn approval_law_matches_cross_product_intersection() {
        // approve(U, T, C) <=> (U x T) n C = {} for small enumerated sets.
        let universe = [1, 2, 3];
        let conflicts = pairs(&[(1, 2), (2, 3)]);
        let edge_set: Vec<(i32, i32)> = conflicts
            .iter()
            .map(|p| (p.group_id1, p.group_id2))
            .collect();

        for held_mask in 0u8..8 {
            for target_mask in 0u8..8 {
                let held: Vec<i32> = universe
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| held_mask & (1 << i) != 0)
                    .map(|(_, g)| *g)
                    .collect();
                let target: Vec<i32> = universe
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| target_mask & (1 << i) != 0)
                    .map(|(_, g)| *g)
                    .collect();

                let expect_conflict = held
                    .iter()
                    .any(|h| target.iter().any(|t| edge_set.contains(&(*h, *t))));

                assert_eq!(
                    find_conflict(&held, &target, &conflicts).is_some(),
                    expect_conflict,
                    "held={held:?} target={target:?}"
                );
            }
        }
    }

    struct StubUsers {
        groups: Vec<i32>,
        fail: bool,
    }

    #[async_trait]
    impl ActiveGroupsProvider for StubUsers {
        async fn active_group_ids(&self, _user_id: i32) -> Result<Vec<i32>, FetchError> {
            if self.fail {
                return Err(FetchError("user service unreachable".to_owned()));
            }
            Ok(self.groups.clone())
        }
    }

    struct StubCatalog {
        access_groups: Vec<i32>,
        conflicts: Vec<ConflictPair>,
    }

    #[async_trait]
    impl CatalogProvider for StubCatalog {
        async fn conflict_pairs(&self) -> Result<Vec<ConflictPair>, FetchError> {
            Ok(self.conflicts.clone())
        }

        async fn access_group_ids(&self, _access_id: i32) -> Result<Vec<i32>, FetchError> {
            Ok(self.access_groups.clone())
        }
    }

    fn job(kind: PermissionKind, item_id: i32) -> ValidationJob {
        ValidationJob {
            user_id: 100,
            permission_type: kind,
            item_id,
            request_id: Uuid::new_v4(),
        }
    }

    fn engine(users: StubUsers, catalog: StubCatalog) -> ValidationEngine {
        ValidationEngine::new(Arc::new(users), Arc::new(catalog))
    }

    #[tokio::test]
    async fn group_request_without_conflicts_is_approved() {
        let engine = engine(
            StubUsers {
                groups: vec![],
                fail: false,
            },
            StubCatalog {
                access_groups: vec![],
                conflicts: vec![],
            },
        );

        let result = engine.validate(&job(PermissionKind::Group, 1)).await;
        assert!(result.approved);
        assert!(result.reason.is_none());
    }

    #[tokio::test]
    async fn group_request_conflicting_with_held_group_is_rejected() {
        let engine = engine(
            StubUsers {
                groups: vec![1],
                fail: false,
            },
            StubCatalog {
                access_groups: vec![],
                conflicts: pairs(&[(1, 2)]),
            },
        );

        let result = engine.validate(&job(PermissionKind::Group, 2)).await;
        assert!(!result.approved);
        let reason = result.reason.unwrap();
        assert!(reason.contains("group 1"), "{reason}");
        assert!(reason.contains("group 2"), "{reason}");
    }

    #[tokio::test]
    async fn access_request_is_checked_against_all_containing_groups() {
        // Access 7 belongs to groups {2, 3}; user holds 1; edge (1, 3).
        let engine = engine(
            StubUsers {
                groups: vec![1],
                fail: false,
            },
            StubCatalog {
                access_groups: vec![2, 3],
                conflicts: pairs(&[(1, 3)]),
            },
        );

        let result = engine.validate(&job(PermissionKind::Access, 7)).await;
        assert!(!result.approved);
        assert!(result.reason.unwrap().contains("group 3"));
    }

    #[tokio::test]
    async fn access_with_no_groups_is_rejected_as_integrity_signal() {
        let engine = engine(
            StubUsers {
                groups: vec![],
                fail: false,
            },
            StubCatalog {
                access_groups: vec![],
                conflicts: vec![],
            },
        );

        let result = engine.validate(&job(PermissionKind::Access, 7)).await;
        assert!(!result.approved);
        assert_eq!(result.reason.unwrap(), "no groups found for access 7");
    }

    #[tokio::test]
    async fn fetch_failure_rejects_without_retry() {
        let engine = engine(
            StubUsers {
                groups: vec![],
                fail: true,
            },
            StubCatalog {
                access_groups: vec![],
                conflicts: vec![],
            },
        );

        let result = engine.validate(&job(PermissionKind::Group, 1)).await;
        assert!(!result.approved);
        assert!(result
            .reason
            .unwrap()
            .starts_with("error fetching data:"));
    }
}
