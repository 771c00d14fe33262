use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use user_entitlement_sdk::{
    ActiveGroup, ActiveGroupsResponse, CreateRequestResponse, EntitlementStatus, PermissionKind,
    UserPermissionsResponse, ValidationJob, ValidationResult,
};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::{ActiveGroupsCache, ValidationJobPort};
use crate::domain::repos::{EntitlementRepository, UserRepository};

/// What happened to a consumed validation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The row was transitioned (or already in the target state).
    Applied,
    /// Unknown request id or mismatched payload; logged and dropped.
    Ignored,
}

pub struct PermissionService<E: EntitlementRepository, U: UserRepository> {
    repo: Arc<E>,
    users: Arc<U>,
    jobs: Arc<dyn ValidationJobPort>,
    groups_cache: Arc<dyn ActiveGroupsCache>,
}

impl<E: EntitlementRepository, U: UserRepository> PermissionService<E, U> {
    pub fn new(
        repo: Arc<E>,
        users: Arc<U>,
        jobs: Arc<dyn ValidationJobPort>,
        groups_cache: Arc<dyn ActiveGroupsCache>,
    ) -> Self {
        Self {
            repo,
            users,
            jobs,
            groups_cache,
        }
    }

    /// Accept a new entitlement request.
    ///
    /// The pending row is committed first; publishing the validation job is
    /// best-effort afterwards. A publish failure leaves the request
    /// `pending` and observable, so it can be republished later.
    #[instrument(skip(self, item_name), fields(user_id = %user_id, item_id = %item_id))]
    pub async fn create_request(
        &self,
        user_id: i32,
        kind: PermissionKind,
        item_id: i32,
        item_name: Option<&str>,
    ) -> Result<CreateRequestResponse, DomainError> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        let existing = self.repo.find_by_triple(user_id, kind, item_id).await?;

        if let Some(row) = &existing {
            if row.status.blocks_rerequest() {
                return Err(DomainError::AlreadyRequested {
                    user_id,
                    kind,
                    item_id,
                });
            }
        }

        let request_id = Uuid::new_v4();

        match existing {
            // A revoked or rejected row is re-used with a fresh request id.
            Some(row) => {
                if !self.repo.reset_to_pending(row.id, request_id).await? {
                    // Lost a race with a concurrent request for the same
                    // triple; the other request won.
                    return Err(DomainError::AlreadyRequested {
                        user_id,
                        kind,
                        item_id,
                    });
                }
                debug!(request_id = %request_id, "re-request reuses existing row");
            }
            None => {
                self.repo
                    .insert_pending(user_id, kind, item_id, item_name, request_id)
                    .await?;
                debug!(request_id = %request_id, "pending entitlement created");
            }
        }

        let job = ValidationJob {
            user_id,
            permission_type: kind,
            item_id,
            request_id,
        };
        if let Err(error) = self.jobs.publish(&job).await {
            // Never fail the request after the durable write; the row stays
            // pending and the job can be republished.
            warn!(request_id = %request_id, %error, "validation job publish failed");
        }

        info!(request_id = %request_id, "entitlement request accepted");
        Ok(CreateRequestResponse {
            status: "accepted".to_owned(),
            request_id,
        })
    }

    /// Apply a validation result drawn from the result queue.
    ///
    /// Unknown or mismatched results are logged and dropped (redelivery
    /// will not help); re-delivery of an already-applied result is a no-op.
    #[instrument(skip(self, result), fields(request_id = %result.request_id))]
    pub async fn apply_validation_result(
        &self,
        result: &ValidationResult,
    ) -> Result<ApplyOutcome, DomainError> {
        let Some(row) = self.repo.find_by_request_id(result.request_id).await? else {
            warn!(
                user_id = result.user_id,
                "validation result for unknown request id, dropping"
            );
            return Ok(ApplyOutcome::Ignored);
        };

        if row.user_id != result.user_id
            || row.kind != result.permission_type
            || row.item_id != result.item_id
        {
            warn!(
                row_user = row.user_id,
                result_user = result.user_id,
                "validation result does not match stored request, dropping"
            );
            return Ok(ApplyOutcome::Ignored);
        }

        let target = if result.approved {
            EntitlementStatus::Active
        } else {
            EntitlementStatus::Rejected
        };

        if row.status == target {
            debug!("row already in target state, result re-applied");
            return Ok(ApplyOutcome::Applied);
        }

        let assigned_at = result.approved.then(Utc::now);
        self.repo.set_status(row.id, target, assigned_at).await?;

        if result.permission_type == PermissionKind::Group {
            self.groups_cache.invalidate(result.user_id).await;
        }

        if result.approved {
            info!(user_id = result.user_id, "entitlement activated");
        } else {
            info!(
                user_id = result.user_id,
                reason = result.reason.as_deref().unwrap_or(""),
                "entitlement rejected"
            );
        }
        Ok(ApplyOutcome::Applied)
    }

    /// Revoke an `active` or `pending` entitlement. Synchronous; no broker
    /// involvement.
    #[instrument(skip(self), fields(user_id = %user_id, item_id = %item_id))]
    pub async fn revoke_permission(
        &self,
        user_id: i32,
        kind: PermissionKind,
        item_id: i32,
    ) -> Result<(), DomainError> {
        let row = self
            .repo
            .find_by_triple(user_id, kind, item_id)
            .await?
            .filter(|row| row.status.blocks_rerequest())
            .ok_or(DomainError::PermissionNotFound {
                user_id,
                kind,
                item_id,
            })?;

        self.repo
            .set_status(row.id, EntitlementStatus::Revoked, Some(Utc::now()))
            .await?;

        if kind == PermissionKind::Group {
            self.groups_cache.invalidate(user_id).await;
        }

        info!("entitlement revoked");
        Ok(())
    }

    /// Every entitlement of the user, partitioned into groups and accesses.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_permissions(
        &self,
        user_id: i32,
    ) -> Result<UserPermissionsResponse, DomainError> {
        let rows = self.repo.find_by_user(user_id).await?;

        let mut groups = Vec::new();
        let mut accesses = Vec::new();
        for row in rows {
            match row.kind {
                PermissionKind::Group => groups.push(row.into()),
                PermissionKind::Access => accesses.push(row.into()),
            }
        }

        Ok(UserPermissionsResponse {
            user_id,
            groups,
            accesses,
        })
    }

    /// Groups the user currently holds as active; read through the cache.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_active_groups(
        &self,
        user_id: i32,
    ) -> Result<ActiveGroupsResponse, DomainError> {
        if let Some(groups) = self.groups_cache.get(user_id).await {
            return Ok(ActiveGroupsResponse { groups });
        }

        let rows = self.repo.find_active_groups(user_id).await?;
        let groups: Vec<ActiveGroup> = rows
            .into_iter()
            .map(|row| ActiveGroup {
                id: row.item_id,
                name: row.item_name,
            })
            .collect();

        self.groups_cache.set(user_id, &groups).await;
        Ok(ActiveGroupsResponse { groups })
    }
}
