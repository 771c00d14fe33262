//! Validation job handler: one decision and one published result per job.

use async_trait::async_trait;
use entitle_broker::{HandleOutcome, MessageHandler, Publisher};
use tracing::{error, info};
use user_entitlement_sdk::ValidationJob;

use crate::engine::ValidationEngine;

pub struct JobHandler {
    engine: ValidationEngine,
    results: Publisher,
}

impl JobHandler {
    #[must_use]
    pub fn new(engine: ValidationEngine, results: Publisher) -> Self {
        Self { engine, results }
    }
}

#[async_trait]
impl MessageHandler for JobHandler {
    async fn handle(&self, payload: &[u8]) -> HandleOutcome {
        let job: ValidationJob = match serde_json::from_slice(payload) {
            Ok(job) => job,
            Err(error) => {
                error!(%error, "malformed validation job, discarding");
                return HandleOutcome::Discard;
            }
        };

        let result = self.engine.validate(&job).await;
        info!(
            request_id = %result.request_id,
            approved = result.approved,
            "validation decided"
        );

        // The result must be durably published before the job is acked;
        // otherwise the job is redelivered and decided again.
        match self.results.publish_json(&result).await {
            Ok(()) => HandleOutcome::Ack,
            Err(error) => {
                error!(request_id = %job.request_id, %error, "result publish failed");
                HandleOutcome::Discard
            }
        }
    }
}
