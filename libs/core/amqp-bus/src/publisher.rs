//! Outbound event publisher.

use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ExchangeKind};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AmqpConfig;
use crate::error::BusError;

/// Publishes JSON messages to a direct exchange.
///
/// One connection and channel are opened at construction, and the durable
/// exchange, queue, and binding are declared up front. `publish` does not
/// wait for broker confirmation, and failed publishes are not retried.
pub struct EventPublisher {
    // Held so the broker connection outlives the channel
    _connection: Connection,
    channel: Channel,
    exchange: String,
    routing_key: String,
}

impl EventPublisher {
    /// Connect to the broker and declare the exchange/queue/binding topology.
    pub async fn connect(config: &AmqpConfig) -> Result<Self, BusError> {
        let connection = crate::connect(config).await?;
        let channel = connection.create_channel().await?;

        channel
            .exchange_declare(
                &config.exchange,
                ExchangeKind::Direct,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        channel
            .queue_declare(
                &config.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        channel
            .queue_bind(
                &config.queue,
                &config.exchange,
                &config.routing_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;

        info!(
            exchange = %config.exchange,
            queue = %config.queue,
            routing_key = %config.routing_key,
            "AMQP publisher ready"
        );

        Ok(Self {
            _connection: connection,
            channel,
            exchange: config.exchange.clone(),
            routing_key: config.routing_key.clone(),
        })
    }

    /// Serialize `message` to JSON and publish it to the configured
    /// exchange/routing key. Returns as soon as the frame is sent; no
    /// delivery confirmation is awaited.
    pub async fn publish<T: Serialize>(&self, message: &T) -> Result<(), BusError> {
        let payload = serde_json::to_vec(message)?;

        // The returned confirm handle is dropped: no delivery confirmation
        let _confirm = self
            .channel
            .basic_publish(
                &self.exchange,
                &self.routing_key,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default().with_content_type("application/json".into()),
            )
            .await?;

        debug!(
            exchange = %self.exchange,
            routing_key = %self.routing_key,
            bytes = payload.len(),
            "Published message"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AmqpConfig;

    #[tokio::test]
    #[ignore] // Requires a running RabbitMQ broker
    async fn test_connect_and_publish() {
        let config = AmqpConfig::default();
        let publisher = EventPublisher::connect(&config).await.unwrap();
        publisher
            .publish(&serde_json::json!({ "ping": true }))
            .await
            .unwrap();
    }
}
