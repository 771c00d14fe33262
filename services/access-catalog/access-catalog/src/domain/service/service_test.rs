#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use access_catalog_sdk::{Access, ConflictPair, Group, GroupRef, Resource, ResourceType};
    use async_trait::async_trait;

    use crate::domain::error::DomainError;
    use crate::domain::ports::{AccessGroupsCache, ConflictMatrixCache, GroupAccessesCache};
    use crate::domain::repos::{
        AccessRepository, ConflictRepository, GroupRepository, ResourceRepository,
    };
    use crate::domain::service::{AccessService, ConflictService, GroupService, ResourceService};

    // In-memory repositories driving the services exactly like the storage
    // layer would.

    #[derive(Default)]
    struct MemConflictRepo {
        pairs: Mutex<Vec<(i32, i32)>>,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl ConflictRepository for MemConflictRepo {
        async fn all(&self) -> Result<Vec<ConflictPair>, DomainError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let pairs = self.pairs.lock().unwrap();
            Ok(pairs
                .iter()
                .map(|&(group_id1, group_id2)| ConflictPair {
                    group_id1,
                    group_id2,
                })
                .collect())
        }

        async fn exists(&self, group_id1: i32, group_id2: i32) -> Result<bool, DomainError> {
            let pairs = self.pairs.lock().unwrap();
            Ok(pairs.contains(&(group_id1, group_id2)))
        }

        async fn create_pair(&self, group_id1: i32, group_id2: i32) -> Result<(), DomainError> {
            let mut pairs = self.pairs.lock().unwrap();
            pairs.push((group_id1, group_id2));
            pairs.push((group_id2, group_id1));
            Ok(())
        }

        async fn delete_pair(&self, group_id1: i32, group_id2: i32) -> Result<bool, DomainError> {
            let mut pairs = self.pairs.lock().unwrap();
            let before = pairs.len();
            pairs.retain(|&(a, b)| {
                !((a == group_id1 && b == group_id2) || (a == group_id2 && b == group_id1))
            });
            Ok(pairs.len() != before)
        }

        async fn group_has_conflicts(&self, group_id: i32) -> Result<bool, DomainError> {
            let pairs = self.pairs.lock().unwrap();
            Ok(pairs.iter().any(|&(a, b)| a == group_id || b == group_id))
        }
    }

    struct MemGroupRepo {
        groups: Mutex<Vec<Group>>,
    }

    impl MemGroupRepo {
        fn with_groups(ids: &[(i32, &str)]) -> Self {
            Self {
                groups: Mutex::new(
                    ids.iter()
                        .map(|&(id, name)| Group {
                            id,
                            name: name.to_owned(),
                            accesses: Vec::new(),
                        })
                        .collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl GroupRepository for MemGroupRepo {
        async fn list(&self) -> Result<Vec<Group>, DomainError> {
            Ok(self.groups.lock().unwrap().clone())
        }

        async fn get(&self, id: i32) -> Result<Option<Group>, DomainError> {
            Ok(self.groups.lock().unwrap().iter().find(|g| g.id == id).cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<GroupRef>, DomainError> {
            Ok(self
                .groups
                .lock()
                .unwrap()
                .iter()
                .find(|g| g.name == name)
                .map(|g| GroupRef {
                    id: g.id,
                    name: g.name.clone(),
                }))
        }

        async fn insert(&self, name: &str, _access_ids: &[i32]) -> Result<Group, DomainError> {
            let mut groups = self.groups.lock().unwrap();
            let id = groups.iter().map(|g| g.id).max().unwrap_or(0) + 1;
            let group = Group {
                id,
                name: name.to_owned(),
                accesses: Vec::new(),
            };
            groups.push(group.clone());
            Ok(group)
        }

        async fn delete(&self, id: i32) -> Result<bool, DomainError> {
            let mut groups = self.groups.lock().unwrap();
            let before = groups.len();
            groups.retain(|g| g.id != id);
            Ok(groups.len() != before)
        }

        async fn accesses_of(&self, _group_id: i32) -> Result<Vec<Access>, DomainError> {
            Ok(Vec::new())
        }

        async fn add_access(&self, _group_id: i32, _access_id: i32) -> Result<bool, DomainError> {
            Ok(true)
        }

        async fn remove_access(
            &self,
            _group_id: i32,
            _access_id: i32,
        ) -> Result<bool, DomainError> {
            Ok(true)
        }
    }

    struct MemAccessRepo {
        accesses: Mutex<Vec<Access>>,
        referenced: bool,
    }

    impl MemAccessRepo {
        fn with_accesses(ids: &[(i32, &str)], referenced: bool) -> Self {
            Self {
                accesses: Mutex::new(
                    ids.iter()
                        .map(|&(id, name)| Access {
                            id,
                            name: name.to_owned(),
                            resources: Vec::new(),
                        })
                        .collect(),
                ),
                referenced,
            }
        }
    }

    #[async_trait]
    impl AccessRepository for MemAccessRepo {
        async fn list(&self) -> Result<Vec<Access>, DomainError> {
            Ok(self.accesses.lock().unwrap().clone())
        }

        async fn get(&self, id: i32) -> Result<Option<Access>, DomainError> {
            Ok(self
                .accesses
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned())
        }

        async fn insert(&self, name: &str, _resource_ids: &[i32]) -> Result<Access, DomainError> {
            let mut accesses = self.accesses.lock().unwrap();
            let id = accesses.iter().map(|a| a.id).max().unwrap_or(0) + 1;
            let access = Access {
                id,
                name: name.to_owned(),
                resources: Vec::new(),
            };
            accesses.push(access.clone());
            Ok(access)
        }

        async fn is_referenced(&self, _id: i32) -> Result<bool, DomainError> {
            Ok(self.referenced)
        }

        async fn delete(&self, id: i32) -> Result<bool, DomainError> {
            let mut accesses = self.accesses.lock().unwrap();
            let before = accesses.len();
            accesses.retain(|a| a.id != id);
            Ok(accesses.len() != before)
        }

        async fn add_resource(
            &self,
            _access_id: i32,
            _resource_id: i32,
        ) -> Result<bool, DomainError> {
            Ok(true)
        }

        async fn remove_resource(
            &self,
            _access_id: i32,
            _resource_id: i32,
        ) -> Result<bool, DomainError> {
            Ok(true)
        }

        async fn groups_containing(&self, _access_id: i32) -> Result<Vec<GroupRef>, DomainError> {
            Ok(vec![GroupRef {
                id: 2,
                name: "QA".to_owned(),
            }])
        }
    }

    struct MemResourceRepo {
        resources: Mutex<Vec<Resource>>,
        referenced: bool,
    }

    #[async_trait]
    impl ResourceRepository for MemResourceRepo {
        async fn list(&self) -> Result<Vec<Resource>, DomainError> {
            Ok(self.resources.lock().unwrap().clone())
        }

        async fn get(&self, id: i32) -> Result<Option<Resource>, DomainError> {
            Ok(self
                .resources
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }

        async fn require_all(&self, ids: &[i32]) -> Result<Vec<Resource>, DomainError> {
            let resources = self.resources.lock().unwrap();
            let mut found = Vec::new();
            for id in ids {
                match resources.iter().find(|r| r.id == *id) {
                    Some(resource) => found.push(resource.clone()),
                    None => return Err(DomainError::not_found("resource", *id)),
                }
            }
            Ok(found)
        }

        async fn insert(
            &self,
            name: &str,
            resource_type: ResourceType,
            description: Option<&str>,
        ) -> Result<Resource, DomainError> {
            let mut resources = self.resources.lock().unwrap();
            let id = resources.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let resource = Resource {
                id,
                name: name.to_owned(),
                resource_type,
                description: description.map(ToOwned::to_owned),
            };
            resources.push(resource.clone());
            Ok(resource)
        }

        async fn is_referenced(&self, _id: i32) -> Result<bool, DomainError> {
            Ok(self.referenced)
        }

        async fn delete(&self, id: i32) -> Result<bool, DomainError> {
            let mut resources = self.resources.lock().unwrap();
            let before = resources.len();
            resources.retain(|r| r.id != id);
            Ok(resources.len() != before)
        }
    }

    // Recording caches.

    #[derive(Default)]
    struct RecordingMatrixCache {
        value: Mutex<Option<Vec<ConflictPair>>>,
        invalidations: AtomicUsize,
    }

    #[async_trait]
    impl ConflictMatrixCache for RecordingMatrixCache {
        async fn get(&self) -> Option<Vec<ConflictPair>> {
            self.value.lock().unwrap().clone()
        }

        async fn set(&self, pairs: &[ConflictPair]) {
            *self.value.lock().unwrap() = Some(pairs.to_vec());
        }

        async fn invalidate(&self) {
            self.invalidations.fetch_add(1, Ordering::SeqCst);
            *self.value.lock().unwrap() = None;
        }
    }

    #[derive(Default)]
    struct RecordingGroupAccessesCache {
        invalidated: Mutex<Vec<i32>>,
    }

    #[async_trait]
    impl GroupAccessesCache for RecordingGroupAccessesCache {
        async fn get(&self, _group_id: i32) -> Option<Vec<Access>> {
            None
        }

        async fn set(&self, _group_id: i32, _accesses: &[Access]) {}

        async fn invalidate(&self, group_id: i32) {
            self.invalidated.lock().unwrap().push(group_id);
        }
    }

    #[derive(Default)]
    struct RecordingAccessGroupsCache {
        invalidated: Mutex<Vec<i32>>,
    }

    #[async_trait]
    impl AccessGroupsCache for RecordingAccessGroupsCache {
        async fn get(&self, _access_id: i32) -> Option<Vec<GroupRef>> {
            None
        }

        async fn set(&self, _access_id: i32, _groups: &[GroupRef]) {}

        async fn invalidate(&self, access_id: i32) {
            self.invalidated.lock().unwrap().push(access_id);
        }
    }

    fn conflict_service(
        repo: Arc<MemConflictRepo>,
        groups: Arc<MemGroupRepo>,
        cache: Arc<RecordingMatrixCache>,
    ) -> ConflictService<MemConflictRepo, MemGroupRepo> {
        ConflictService::new(repo, groups, cache)
    }

    #[tokio::test]
    async fn matrix_read_through_populates_cache() {
        let repo = Arc::new(MemConflictRepo::default());
        repo.create_pair(1, 2).await.unwrap();
        let cache = Arc::new(RecordingMatrixCache::default());
        let service = conflict_service(
            repo.clone(),
            Arc::new(MemGroupRepo::with_groups(&[(1, "Dev"), (2, "QA")])),
            cache.clone(),
        );

        let first = service.get_conflict_matrix().await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(repo.reads.load(Ordering::SeqCst), 1);

        // Second read is served from the cache.
        let second = service.get_conflict_matrix().await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(repo.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn create_conflict_rejects_self_pair() {
        let service = conflict_service(
            Arc::new(MemConflictRepo::default()),
            Arc::new(MemGroupRepo::with_groups(&[(1, "Dev")])),
            Arc::new(RecordingMatrixCache::default()),
        );

        let error = service.create_conflict(1, 1).await.unwrap_err();
        assert!(matches!(error, DomainError::SelfConflict));
    }

    #[tokio::test]
    async fn create_conflict_requires_known_groups() {
        let service = conflict_service(
            Arc::new(MemConflictRepo::default()),
            Arc::new(MemGroupRepo::with_groups(&[(1, "Dev")])),
            Arc::new(RecordingMatrixCache::default()),
        );

        let error = service.create_conflict(1, 9).await.unwrap_err();
        assert!(matches!(error, DomainError::NotFound { id: 9, .. }));
    }

    #[tokio::test]
    async fn create_conflict_stores_both_directions_and_invalidates() {
        let repo = Arc::new(MemConflictRepo::default());
        let cache = Arc::new(RecordingMatrixCache::default());
        let service = conflict_service(
            repo.clone(),
            Arc::new(MemGroupRepo::with_groups(&[(1, "Dev"), (2, "QA")])),
            cache.clone(),
        );

        service.create_conflict(1, 2).await.unwrap();

        let pairs = repo.pairs.lock().unwrap().clone();
        assert!(pairs.contains(&(1, 2)));
        assert!(pairs.contains(&(2, 1)));
        assert_eq!(cache.invalidations.load(Ordering::SeqCst), 1);

        // Symmetric duplicate is refused either way round.
        let error = service.create_conflict(2, 1).await.unwrap_err();
        assert!(matches!(error, DomainError::ConflictExists { .. }));
    }

    #[tokio::test]
    async fn create_then_delete_conflict_restores_previous_matrix() {
        let repo = Arc::new(MemConflictRepo::default());
        let cache = Arc::new(RecordingMatrixCache::default());
        let service = conflict_service(
            repo.clone(),
            Arc::new(MemGroupRepo::with_groups(&[(1, "Dev"), (2, "QA")])),
            cache.clone(),
        );

        let before = service.get_conflict_matrix().await.unwrap();
        service.create_conflict(1, 2).await.unwrap();
        service.delete_conflict(1, 2).await.unwrap();
        let after = service.get_conflict_matrix().await.unwrap();

        assert_eq!(before, after);
        assert!(repo.pairs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_conflict_missing_pair_is_not_found() {
        let service = conflict_service(
            Arc::new(MemConflictRepo::default()),
            Arc::new(MemGroupRepo::with_groups(&[(1, "Dev"), (2, "QA")])),
            Arc::new(RecordingMatrixCache::default()),
        );

        let error = service.delete_conflict(1, 2).await.unwrap_err();
        assert!(matches!(error, DomainError::ConflictNotFound { .. }));
    }

    fn group_service(
        repo: Arc<MemGroupRepo>,
        accesses: Arc<MemAccessRepo>,
        conflicts: Arc<MemConflictRepo>,
        group_cache: Arc<RecordingGroupAccessesCache>,
        access_cache: Arc<RecordingAccessGroupsCache>,
    ) -> GroupService<MemGroupRepo, MemAccessRepo, MemConflictRepo> {
        GroupService::new(repo, accesses, conflicts, group_cache, access_cache)
    }

    #[tokio::test]
    async fn delete_group_with_conflict_edges_is_refused() {
        let conflicts = Arc::new(MemConflictRepo::default());
        conflicts.create_pair(1, 2).await.unwrap();
        let service = group_service(
            Arc::new(MemGroupRepo::with_groups(&[(1, "Dev"), (2, "QA")])),
            Arc::new(MemAccessRepo::with_accesses(&[], false)),
            conflicts,
            Arc::new(RecordingGroupAccessesCache::default()),
            Arc::new(RecordingAccessGroupsCache::default()),
        );

        let error = service.delete_group(1).await.unwrap_err();
        assert!(matches!(error, DomainError::ReferencedBy { .. }));
    }

    #[tokio::test]
    async fn create_group_refuses_duplicate_name() {
        let service = group_service(
            Arc::new(MemGroupRepo::with_groups(&[(1, "Dev")])),
            Arc::new(MemAccessRepo::with_accesses(&[], false)),
            Arc::new(MemConflictRepo::default()),
            Arc::new(RecordingGroupAccessesCache::default()),
            Arc::new(RecordingAccessGroupsCache::default()),
        );

        let error = service.create_group("Dev", &[]).await.unwrap_err();
        assert!(matches!(error, DomainError::GroupNameTaken { .. }));
    }

    #[tokio::test]
    async fn membership_change_invalidates_both_projections() {
        let group_cache = Arc::new(RecordingGroupAccessesCache::default());
        let access_cache = Arc::new(RecordingAccessGroupsCache::default());
        let service = group_service(
            Arc::new(MemGroupRepo::with_groups(&[(1, "Dev")])),
            Arc::new(MemAccessRepo::with_accesses(&[(7, "Deploy")], false)),
            Arc::new(MemConflictRepo::default()),
            group_cache.clone(),
            access_cache.clone(),
        );

        service.add_access(1, 7).await.unwrap();

        assert_eq!(*group_cache.invalidated.lock().unwrap(), vec![1]);
        assert_eq!(*access_cache.invalidated.lock().unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn delete_access_referenced_by_group_is_refused() {
        let service = AccessService::new(
            Arc::new(MemAccessRepo::with_accesses(&[(7, "Deploy")], true)),
            Arc::new(MemResourceRepo {
                resources: Mutex::new(Vec::new()),
                referenced: false,
            }),
            Arc::new(RecordingAccessGroupsCache::default()),
        );

        let error = service.delete_access(7).await.unwrap_err();
        assert!(matches!(error, DomainError::ReferencedBy { .. }));
    }

    #[tokio::test]
    async fn delete_resource_referenced_by_access_is_refused() {
        let service = ResourceService::new(Arc::new(MemResourceRepo {
            resources: Mutex::new(vec![Resource {
                id: 3,
                name: "billing-db".to_owned(),
                resource_type: ResourceType::Database,
                description: None,
            }]),
            referenced: true,
        }));

        let error = service.delete_resource(3).await.unwrap_err();
        assert!(matches!(error, DomainError::ReferencedBy { .. }));
    }

    #[tokio::test]
    async fn create_resource_validates_name() {
        let service = ResourceService::new(Arc::new(MemResourceRepo {
            resources: Mutex::new(Vec::new()),
            referenced: false,
        }));

        let error = service
            .create_resource("", ResourceType::Api, None)
            .await
            .unwrap_err();
        assert!(matches!(error, DomainError::Validation { .. }));
    }
}
