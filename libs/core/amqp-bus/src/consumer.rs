//! Queue consumer with bounded reconnect.
//!
//! The consumer moves through disconnected → connecting (bounded, fixed
//! delay) → listening. When the retry budget is exhausted it stops
//! silently and the rest of the process keeps running without a consumer.

use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{BasicConsumeOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AmqpConfig;
use crate::error::BusError;

/// Handler for messages of type `M` read off the queue.
#[async_trait]
pub trait QueueProcessor<M>: Send + Sync
where
    M: DeserializeOwned + Send + Sync,
{
    /// Process one message. By the time this runs the delivery is already
    /// acknowledged; returning an error only logs and drops the message.
    async fn process(&self, message: &M) -> Result<(), BusError>;

    /// Processor name for logging.
    fn name(&self) -> &'static str;
}

/// Consumes a queue and dispatches each delivery to a [`QueueProcessor`].
pub struct QueueConsumer {
    config: AmqpConfig,
}

impl QueueConsumer {
    pub fn new(config: AmqpConfig) -> Self {
        Self { config }
    }

    /// Run the consume loop.
    ///
    /// Each failed connection attempt consumes one retry and waits the
    /// configured fixed delay. After the budget is exhausted the consumer
    /// returns; it never takes the process down with it.
    pub async fn run<M, P>(&self, processor: P)
    where
        M: DeserializeOwned + Send + Sync,
        P: QueueProcessor<M>,
    {
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            match self.listen(&processor).await {
                Ok(()) => {
                    info!(queue = %self.config.queue, "Consumer channel closed, stopping");
                    return;
                }
                Err(e) => {
                    if attempts >= self.config.connect_retries {
                        warn!(
                            queue = %self.config.queue,
                            attempts,
                            error = %e,
                            "Consumer giving up; service continues without a consumer"
                        );
                        return;
                    }

                    warn!(
                        queue = %self.config.queue,
                        attempt = attempts,
                        error = %e,
                        "AMQP connection failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.connect_delay_ms)).await;
                }
            }
        }
    }

    async fn listen<M, P>(&self, processor: &P) -> Result<(), BusError>
    where
        M: DeserializeOwned + Send + Sync,
        P: QueueProcessor<M>,
    {
        let connection = crate::connect(&self.config).await?;
        let channel = connection.create_channel().await?;

        channel
            .queue_declare(
                &self.config.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        let consumer_tag = format!("{}-{}", processor.name(), Uuid::new_v4());

        // no_ack: the broker acknowledges on delivery, before processing.
        // At-most-once: a message whose handler fails is never redelivered.
        let mut consumer = channel
            .basic_consume(
                &self.config.queue,
                &consumer_tag,
                BasicConsumeOptions {
                    no_ack: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        info!(queue = %self.config.queue, consumer_tag = %consumer_tag, "Waiting for messages");

        while let Some(delivery) = consumer.next().await {
            let delivery = delivery?;

            match serde_json::from_slice::<M>(&delivery.data) {
                Ok(message) => {
                    if let Err(e) = processor.process(&message).await {
                        warn!(
                            processor = processor.name(),
                            error = %e,
                            "Message processing failed; message dropped"
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        queue = %self.config.queue,
                        error = %e,
                        "Failed to parse message, dropping"
                    );
                }
            }
        }

        Ok(())
    }
}
