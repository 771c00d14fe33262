//! Validation job publisher over the shared broker connection.

use async_trait::async_trait;
use entitle_broker::Publisher;
use user_entitlement_sdk::ValidationJob;

use crate::domain::ports::{PublishError, ValidationJobPort};

/// Owns the publishing channel for `validation_queue`; never shared with
/// the result consumer's channel.
pub struct BrokerJobPublisher {
    publisher: Publisher,
}

impl BrokerJobPublisher {
    #[must_use]
    pub fn new(publisher: Publisher) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl ValidationJobPort for BrokerJobPublisher {
    async fn publish(&self, job: &ValidationJob) -> Result<(), PublishError> {
        self.publisher
            .publish_json(job)
            .await
            .map_err(|error| PublishError(error.to_string()))
    }
}
