//! RabbitMQ (AMQP 0-9-1) plumbing shared by services.
//!
//! Two halves:
//! - [`EventPublisher`]: holds one connection/channel, declares a durable
//!   exchange/queue/binding at construction, and publishes JSON messages
//!   without waiting for broker confirmation.
//! - [`QueueConsumer`]: connects with a bounded number of fixed-delay
//!   retries, declares its queue, and dispatches each delivery to a
//!   [`QueueProcessor`]. Deliveries are auto-acknowledged by the broker at
//!   dispatch time, so processing failures drop the message (at-most-once).
//!
//! # Example
//!
//! ```ignore
//! use amqp_bus::{AmqpConfig, EventPublisher, QueueConsumer};
//! use core_config::FromEnv;
//!
//! let config = AmqpConfig::from_env()?;
//! let publisher = EventPublisher::connect(&config).await?;
//! publisher.publish(&event).await?;
//!
//! let consumer = QueueConsumer::new(config);
//! tokio::spawn(async move { consumer.run(processor).await });
//! ```

pub mod config;
pub mod consumer;
pub mod error;
pub mod publisher;

pub use config::AmqpConfig;
pub use consumer::{QueueConsumer, QueueProcessor};
pub use error::BusError;
pub use publisher::EventPublisher;

use lapin::{Connection, ConnectionProperties};

/// Open an AMQP connection on the tokio runtime.
pub(crate) async fn connect(config: &AmqpConfig) -> Result<Connection, lapin::Error> {
    let options = ConnectionProperties::default()
        .with_executor(tokio_executor_trait::Tokio::current())
        .with_reactor(tokio_reactor_trait::Tokio);

    Connection::connect(&config.uri(), options).await
}
