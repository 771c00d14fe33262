#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use user_entitlement_sdk::{
        ActiveGroup, EntitlementStatus, PermissionKind, UserDto, ValidationJob, ValidationResult,
    };
    use uuid::Uuid;

    use crate::domain::error::DomainError;
    use crate::domain::model::Entitlement;
    use crate::domain::ports::{ActiveGroupsCache, PublishError, ValidationJobPort};
    use crate::domain::repos::{EntitlementRepository, UserRepository};
    use crate::domain::service::{ApplyOutcome, PermissionService, UserService};

    // In-memory entitlement store mirroring the uniqueness and status-guard
    // behavior of the real repository.

    #[derive(Default)]
    struct MemEntitlementRepo {
        rows: Mutex<Vec<Entitlement>>,
    }

    impl MemEntitlementRepo {
        fn with_rows(rows: Vec<Entitlement>) -> Self {
            Self {
                rows: Mutex::new(rows),
            }
        }

        fn row(&self, id: i32) -> Option<Entitlement> {
            self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned()
        }
    }

    #[async_trait]
    impl EntitlementRepository for MemEntitlementRepo {
        async fn find_by_user(&self, user_id: i32) -> Result<Vec<Entitlement>, DomainError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn find_by_triple(
            &self,
            user_id: i32,
            kind: PermissionKind,
            item_id: i32,
        ) -> Result<Option<Entitlement>, DomainError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.user_id == user_id && r.kind == kind && r.item_id == item_id)
                .cloned())
        }

        async fn find_by_request_id(
            &self,
            request_id: Uuid,
        ) -> Result<Option<Entitlement>, DomainError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.request_id == request_id)
                .cloned())
        }

        async fn find_active_groups(&self, user_id: i32) -> Result<Vec<Entitlement>, DomainError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.user_id == user_id
                        && r.kind == PermissionKind::Group
                        && r.status == EntitlementStatus::Active
                })
                .cloned()
                .collect())
        }

        async fn insert_pending(
            &self,
            user_id: i32,
            kind: PermissionKind,
            item_id: i32,
            item_name: Option<&str>,
            request_id: Uuid,
        ) -> Result<Entitlement, DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let row = Entitlement {
                id,
                user_id,
                kind,
                item_id,
                item_name: item_name.map(ToOwned::to_owned),
                status: EntitlementStatus::Pending,
                request_id,
                assigned_at: None,
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn reset_to_pending(&self, id: i32, request_id: Uuid) -> Result<bool, DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
                return Ok(false);
            };
            if row.status.blocks_rerequest() {
                return Ok(false);
            }
            row.status = EntitlementStatus::Pending;
            row.request_id = request_id;
            row.assigned_at = None;
            Ok(true)
        }

        async fn set_status(
            &self,
            id: i32,
            status: EntitlementStatus,
            assigned_at: Option<DateTime<Utc>>,
        ) -> Result<bool, DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
                return Ok(false);
            };
            row.status = status;
            if let Some(ts) = assigned_at {
                row.assigned_at = Some(ts);
            }
            Ok(true)
        }
    }

    struct MemUserRepo {
        users: Mutex<Vec<UserDto>>,
    }

    impl MemUserRepo {
        fn with_user(id: i32, username: &str) -> Self {
            Self {
                users: Mutex::new(vec![UserDto {
                    id,
                    username: username.to_owned(),
                }]),
            }
        }
    }

    #[async_trait]
    impl UserRepository for MemUserRepo {
        async fn get(&self, id: i32) -> Result<Option<UserDto>, DomainError> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<UserDto>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn insert(&self, username: &str) -> Result<UserDto, DomainError> {
            let mut users = self.users.lock().unwrap();
            let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            let user = UserDto {
                id,
                username: username.to_owned(),
            };
            users.push(user.clone());
            Ok(user)
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        jobs: Mutex<Vec<ValidationJob>>,
        fail: bool,
    }

    #[async_trait]
    impl ValidationJobPort for RecordingPublisher {
        async fn publish(&self, job: &ValidationJob) -> Result<(), PublishError> {
            if self.fail {
                return Err(PublishError("broker down".to_owned()));
            }
            self.jobs.lock().unwrap().push(job.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingGroupsCache {
        value: Mutex<Option<Vec<ActiveGroup>>>,
        invalidated: Mutex<Vec<i32>>,
    }

    #[async_trait]
    impl ActiveGroupsCache for RecordingGroupsCache {
        async fn get(&self, _user_id: i32) -> Option<Vec<ActiveGroup>> {
            self.value.lock().unwrap().clone()
        }

        async fn set(&self, _user_id: i32, groups: &[ActiveGroup]) {
            *self.value.lock().unwrap() = Some(groups.to_vec());
        }

        async fn invalidate(&self, user_id: i32) {
            self.invalidated.lock().unwrap().push(user_id);
            *self.value.lock().unwrap() = None;
        }
    }

    struct Fixture {
        repo: Arc<MemEntitlementRepo>,
        publisher: Arc<RecordingPublisher>,
        cache: Arc<RecordingGroupsCache>,
        service: PermissionService<MemEntitlementRepo, MemUserRepo>,
    }

    fn fixture_with_rows(rows: Vec<Entitlement>, publish_fails: bool) -> Fixture {
        let repo = Arc::new(MemEntitlementRepo::with_rows(rows));
        let publisher = Arc::new(RecordingPublisher {
            jobs: Mutex::new(Vec::new()),
            fail: publish_fails,
        });
        let cache = Arc::new(RecordingGroupsCache::default());
        let service = PermissionService::new(
            repo.clone(),
            Arc::new(MemUserRepo::with_user(100, "alice")),
            publisher.clone(),
            cache.clone(),
        );
        Fixture {
            repo,
            publisher,
            cache,
            service,
        }
    }

    fn active_group_row(id: i32, user_id: i32, group_id: i32) -> Entitlement {
        Entitlement {
            id,
            user_id,
            kind: PermissionKind::Group,
            item_id: group_id,
            item_name: Some(format!("group-{group_id}")),
            status: EntitlementStatus::Active,
            request_id: Uuid::new_v4(),
            assigned_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn create_request_persists_pending_and_publishes_job() {
        let fx = fixture_with_rows(Vec::new(), false);

        let response = fx
            .service
            .create_request(100, PermissionKind::Group, 1, Some("Dev"))
            .await
            .unwrap();

        assert_eq!(response.status, "accepted");

        let row = fx.repo.row(1).unwrap();
        assert_eq!(row.status, EntitlementStatus::Pending);
        assert_eq!(row.request_id, response.request_id);
        assert!(row.assigned_at.is_none());

        let jobs = fx.publisher.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].request_id, response.request_id);
        assert_eq!(jobs[0].permission_type, PermissionKind::Group);
    }

    #[tokio::test]
    async fn create_request_for_unknown_user_is_rejected() {
        let fx = fixture_with_rows(Vec::new(), false);

        let error = fx
            .service
            .create_request(999, PermissionKind::Group, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(error, DomainError::UserNotFound { id: 999 }));
    }

    #[tokio::test]
    async fn duplicate_request_while_active_is_a_conflict() {
        let fx = fixture_with_rows(vec![active_group_row(1, 100, 1)], false);

        let error = fx
            .service
            .create_request(100, PermissionKind::Group, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(error, DomainError::AlreadyRequested { .. }));
        assert!(fx.publisher.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rerequest_after_rejection_reuses_row_with_fresh_request_id() {
        let mut row = active_group_row(1, 100, 2);
        row.status = EntitlementStatus::Rejected;
        row.assigned_at = None;
        let old_request_id = row.request_id;
        let fx = fixture_with_rows(vec![row], false);

        let response = fx
            .service
            .create_request(100, PermissionKind::Group, 2, None)
            .await
            .unwrap();

        assert_ne!(response.request_id, old_request_id);

        // Same row, not a second one.
        let rows = fx.repo.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].status, EntitlementStatus::Pending);
        assert_eq!(rows[0].request_id, response.request_id);
        assert!(rows[0].assigned_at.is_none());
    }

    #[tokio::test]
    async fn publish_failure_keeps_request_accepted_and_pending() {
        let fx = fixture_with_rows(Vec::new(), true);

        let response = fx
            .service
            .create_request(100, PermissionKind::Access, 7, None)
            .await
            .unwrap();

        assert_eq!(response.status, "accepted");
        let row = fx.repo.row(1).unwrap();
        assert_eq!(row.status, EntitlementStatus::Pending);
    }

    fn result_for(row: &Entitlement, approved: bool) -> ValidationResult {
        ValidationResult {
            request_id: row.request_id,
            approved,
            user_id: row.user_id,
            permission_type: row.kind,
            item_id: row.item_id,
            reason: (!approved).then(|| "conflict detected".to_owned()),
        }
    }

    #[tokio::test]
    async fn approved_result_activates_row_and_invalidates_cache() {
        let fx = fixture_with_rows(Vec::new(), false);
        fx.service
            .create_request(100, PermissionKind::Group, 1, None)
            .await
            .unwrap();
        let row = fx.repo.row(1).unwrap();

        let outcome = fx
            .service
            .apply_validation_result(&result_for(&row, true))
            .await
            .unwrap();

        assert_eq!(outcome, ApplyOutcome::Applied);
        let row = fx.repo.row(1).unwrap();
        assert_eq!(row.status, EntitlementStatus::Active);
        assert!(row.assigned_at.is_some());
        assert_eq!(*fx.cache.invalidated.lock().unwrap(), vec![100]);
    }

    #[tokio::test]
    async fn rejected_result_leaves_assigned_at_unset() {
        let fx = fixture_with_rows(Vec::new(), false);
        fx.service
            .create_request(100, PermissionKind::Group, 2, None)
            .await
            .unwrap();
        let row = fx.repo.row(1).unwrap();

        fx.service
            .apply_validation_result(&result_for(&row, false))
            .await
            .unwrap();

        let row = fx.repo.row(1).unwrap();
        assert_eq!(row.status, EntitlementStatus::Rejected);
        assert!(row.assigned_at.is_none());
    }

    #[tokio::test]
    async fn result_for_unknown_request_id_is_ignored() {
        let fx = fixture_with_rows(Vec::new(), false);

        let outcome = fx
            .service
            .apply_validation_result(&ValidationResult {
                request_id: Uuid::new_v4(),
                approved: true,
                user_id: 100,
                permission_type: PermissionKind::Group,
                item_id: 1,
                reason: None,
            })
            .await
            .unwrap();

        assert_eq!(outcome, ApplyOutcome::Ignored);
    }

    #[tokio::test]
    async fn mismatched_result_payload_is_ignored() {
        let fx = fixture_with_rows(Vec::new(), false);
        fx.service
            .create_request(100, PermissionKind::Group, 1, None)
            .await
            .unwrap();
        let row = fx.repo.row(1).unwrap();

        let mut result = result_for(&row, true);
        result.item_id = 999;

        let outcome = fx.service.apply_validation_result(&result).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::Ignored);

        // Row untouched.
        assert_eq!(fx.repo.row(1).unwrap().status, EntitlementStatus::Pending);
    }

    #[tokio::test]
    async fn duplicate_result_delivery_is_idempotent() {
        let fx = fixture_with_rows(Vec::new(), false);
        fx.service
            .create_request(100, PermissionKind::Group, 1, None)
            .await
            .unwrap();
        let row = fx.repo.row(1).unwrap();
        let result = result_for(&row, true);

        fx.service.apply_validation_result(&result).await.unwrap();
        let first_assigned_at = fx.repo.row(1).unwrap().assigned_at;

        let outcome = fx.service.apply_validation_result(&result).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied);

        let row = fx.repo.row(1).unwrap();
        assert_eq!(row.status, EntitlementStatus::Active);
        assert_eq!(row.assigned_at, first_assigned_at);
    }

    #[tokio::test]
    async fn revoke_active_group_invalidates_cache() {
        let fx = fixture_with_rows(vec![active_group_row(1, 100, 1)], false);

        fx.service
            .revoke_permission(100, PermissionKind::Group, 1)
            .await
            .unwrap();

        let row = fx.repo.row(1).unwrap();
        assert_eq!(row.status, EntitlementStatus::Revoked);
        assert!(row.assigned_at.is_some());
        assert_eq!(*fx.cache.invalidated.lock().unwrap(), vec![100]);
    }

    #[tokio::test]
    async fn revoke_without_active_or_pending_row_is_not_found() {
        let mut row = active_group_row(1, 100, 1);
        row.status = EntitlementStatus::Rejected;
        let fx = fixture_with_rows(vec![row], false);

        let error = fx
            .service
            .revoke_permission(100, PermissionKind::Group, 1)
            .await
            .unwrap_err();
        assert!(matches!(error, DomainError::PermissionNotFound { .. }));
    }

    #[tokio::test]
    async fn revoke_then_rerequest_yields_pending_with_new_request_id() {
        let fx = fixture_with_rows(vec![active_group_row(1, 100, 1)], false);
        let old_request_id = fx.repo.row(1).unwrap().request_id;

        fx.service
            .revoke_permission(100, PermissionKind::Group, 1)
            .await
            .unwrap();
        let response = fx
            .service
            .create_request(100, PermissionKind::Group, 1, None)
            .await
            .unwrap();

        assert_ne!(response.request_id, old_request_id);
        let rows = fx.repo.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, EntitlementStatus::Pending);
    }

    #[tokio::test]
    async fn get_permissions_partitions_by_kind() {
        let mut access_row = active_group_row(2, 100, 7);
        access_row.kind = PermissionKind::Access;
        let fx = fixture_with_rows(vec![active_group_row(1, 100, 1), access_row], false);

        let response = fx.service.get_permissions(100).await.unwrap();

        assert_eq!(response.user_id, 100);
        assert_eq!(response.groups.len(), 1);
        assert_eq!(response.accesses.len(), 1);
        assert_eq!(response.groups[0].item_id, 1);
        assert_eq!(response.accesses[0].item_id, 7);
    }

    #[tokio::test]
    async fn get_active_groups_reads_through_cache() {
        let fx = fixture_with_rows(vec![active_group_row(1, 100, 1)], false);

        let first = fx.service.get_active_groups(100).await.unwrap();
        assert_eq!(first.groups.len(), 1);
        assert_eq!(first.groups[0].id, 1);

        // Cache is now populated; drain the store to prove the second read
        // comes from the cache.
        fx.repo.rows.lock().unwrap().clear();
        let second = fx.service.get_active_groups(100).await.unwrap();
        assert_eq!(second.groups.len(), 1);
    }

    #[tokio::test]
    async fn revoked_group_disappears_from_active_groups() {
        let fx = fixture_with_rows(vec![active_group_row(1, 100, 1)], false);

        // Prime the cache, then revoke.
        fx.service.get_active_groups(100).await.unwrap();
        fx.service
            .revoke_permission(100, PermissionKind::Group, 1)
            .await
            .unwrap();

        let groups = fx.service.get_active_groups(100).await.unwrap();
        assert!(groups.groups.is_empty());
    }

    #[tokio::test]
    async fn create_user_enforces_username_rules() {
        let repo = Arc::new(MemUserRepo::with_user(1, "alice"));
        let service = UserService::new(repo);

        assert!(matches!(
            service.create_user("").await.unwrap_err(),
            DomainError::Validation { .. }
        ));
        assert!(matches!(
            service.create_user(&"x".repeat(51)).await.unwrap_err(),
            DomainError::Validation { .. }
        ));
        assert!(matches!(
            service.create_user("alice").await.unwrap_err(),
            DomainError::UsernameTaken { .. }
        ));

        let user = service.create_user("bob").await.unwrap();
        assert_eq!(user.username, "bob");
    }
}
