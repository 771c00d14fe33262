//! AMQP plumbing shared by the entitlement and validation services.
//!
//! One [`Broker`] per service holds the connection; each logical role
//! (publisher, consumer) gets its own channel. Queues are durable, messages
//! are published persistently, and consumers ack explicitly with
//! `prefetch=1` so one in-flight message per worker is guaranteed.

use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicPublishOptions, BasicQosOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Queue carrying validation jobs from the entitlement service to the
/// validation workers.
pub const VALIDATION_QUEUE: &str = "validation_queue";

/// Queue carrying validation results back to the entitlement service.
pub const RESULT_QUEUE: &str = "result_queue";

/// AMQP delivery mode for persistent messages.
const PERSISTENT: u8 = 2;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker operation failed: {0}")]
    Amqp(#[from] lapin::Error),
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What to do with a delivery after the handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Processing finished (including "stale message, nothing to do").
    Ack,
    /// Poison or unprocessable message; nack without requeue.
    Discard,
}

/// Processes one delivery payload at a time.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: &[u8]) -> HandleOutcome;
}

/// One AMQP connection per service.
pub struct Broker {
    conn: Connection,
}

impl Broker {
    pub async fn connect(url: &str) -> Result<Self, BrokerError> {
        let conn = Connection::connect(url, ConnectionProperties::default()).await?;
        info!("broker connection established");
        Ok(Self { conn })
    }

    /// Open a publishing channel and declare the target queue durably.
    pub async fn publisher(&self, queue: &str) -> Result<Publisher, BrokerError> {
        let channel = self.conn.create_channel().await?;
        declare_durable(&channel, queue).await?;
        Ok(Publisher {
            channel,
            queue: queue.to_owned(),
        })
    }

    /// Open a consuming channel with `prefetch=1` on the given queue.
    pub async fn consumer(&self, queue: &str, tag: &str) -> Result<QueueConsumer, BrokerError> {
        let channel = self.conn.create_channel().await?;
        declare_durable(&channel, queue).await?;
        channel.basic_qos(1, BasicQosOptions::default()).await?;
        let consumer = channel
            .basic_consume(
                queue,
                tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;
        Ok(QueueConsumer {
            queue: queue.to_owned(),
            consumer,
        })
    }

    /// Whether the underlying connection is still usable.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn.status().connected()
    }

    pub async fn close(&self) {
        if let Err(error) = self.conn.close(0, "shutdown").await {
            warn!(%error, "broker connection close failed");
        }
    }
}

async fn declare_durable(channel: &Channel, queue: &str) -> Result<(), BrokerError> {
    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..QueueDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await?;
    Ok(())
}

/// Publishes JSON messages persistently to one queue.
pub struct Publisher {
    channel: Channel,
    queue: String,
}

impl Publisher {
    pub async fn publish_json<T: Serialize>(&self, message: &T) -> Result<(), BrokerError> {
        let payload = serde_json::to_vec(message)?;
        let _confirm = self
            .channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    .with_delivery_mode(PERSISTENT),
            )
            .await?;
        debug!(queue = %self.queue, bytes = payload.len(), "message published");
        Ok(())
    }

    #[must_use]
    pub fn queue(&self) -> &str {
        &self.queue
    }
}

/// Long-running consumer loop with cooperative cancellation.
pub struct QueueConsumer {
    queue: String,
    consumer: lapin::Consumer,
}

impl QueueConsumer {
    /// Consume until the queue closes or `shutdown` fires. The in-flight
    /// message always finishes processing before the loop exits.
    ///
    /// Handler outcomes map to ack / nack-without-requeue; a single bad
    /// message never stops the loop.
    pub async fn run<H: MessageHandler>(
        mut self,
        handler: &H,
        shutdown: CancellationToken,
    ) -> Result<(), BrokerError> {
        info!(queue = %self.queue, "consumer started");

        loop {
            let delivery = tokio::select! {
                () = shutdown.cancelled() => {
                    info!(queue = %self.queue, "consumer stopping on shutdown signal");
                    break;
                }
                delivery = self.consumer.next() => delivery,
            };

            let Some(delivery) = delivery else {
                warn!(queue = %self.queue, "consumer stream closed by broker");
                break;
            };

            let delivery = match delivery {
                Ok(delivery) => delivery,
                Err(error) => {
                    error!(queue = %self.queue, %error, "delivery error");
                    continue;
                }
            };

            match handler.handle(&delivery.data).await {
                HandleOutcome::Ack => {
                    if let Err(error) = delivery.ack(BasicAckOptions::default()).await {
                        error!(queue = %self.queue, %error, "ack failed");
                    }
                }
                HandleOutcome::Discard => {
                    let options = BasicNackOptions {
                        requeue: false,
                        ..BasicNackOptions::default()
                    };
                    if let Err(error) = delivery.nack(options).await {
                        error!(queue = %self.queue, %error, "nack failed");
                    }
                }
            }
        }

        info!(queue = %self.queue, "consumer stopped");
        Ok(())
    }
}
