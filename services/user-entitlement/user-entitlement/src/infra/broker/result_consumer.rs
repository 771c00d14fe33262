//! Handler for validation results drawn from `result_queue`.

use std::sync::Arc;

use async_trait::async_trait;
use entitle_broker::{HandleOutcome, MessageHandler};
use tracing::error;
use user_entitlement_sdk::ValidationResult;

use crate::domain::repos::{EntitlementRepository, UserRepository};
use crate::domain::service::PermissionService;

pub struct ResultHandler<E: EntitlementRepository, U: UserRepository> {
    service: Arc<PermissionService<E, U>>,
}

impl<E: EntitlementRepository, U: UserRepository> ResultHandler<E, U> {
    #[must_use]
    pub fn new(service: Arc<PermissionService<E, U>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<E: EntitlementRepository, U: UserRepository> MessageHandler for ResultHandler<E, U> {
    async fn handle(&self, payload: &[u8]) -> HandleOutcome {
        let result: ValidationResult = match serde_json::from_slice(payload) {
            Ok(result) => result,
            Err(error) => {
                error!(%error, "malformed validation result, discarding");
                return HandleOutcome::Discard;
            }
        };

        // Unknown or mismatched results ack (redelivery will not help);
        // only store failures reach the discard path.
        match self.service.apply_validation_result(&result).await {
            Ok(_) => HandleOutcome::Ack,
            Err(error) => {
                error!(
                    request_id = %result.request_id,
                    %error,
                    "failed to apply validation result"
                );
                HandleOutcome::Discard
            }
        }
    }
}
