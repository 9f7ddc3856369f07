//! Outbound product-changed events.

use amqp_bus::{BusError, EventPublisher};
use async_trait::async_trait;
use std::sync::Arc;

use crate::models::ProductChanged;

/// Sink for product-changed events.
///
/// The service treats publishing as best-effort: failures are logged by
/// the caller and never surfaced to the HTTP client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChangePublisher: Send + Sync {
    async fn publish_changed(&self, event: &ProductChanged) -> Result<(), BusError>;
}

/// Publishes product-changed events over the AMQP bus.
pub struct AmqpChangePublisher {
    bus: Arc<EventPublisher>,
}

impl AmqpChangePublisher {
    pub fn new(bus: EventPublisher) -> Self {
        Self { bus: Arc::new(bus) }
    }

    pub fn from_arc(bus: Arc<EventPublisher>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl ChangePublisher for AmqpChangePublisher {
    async fn publish_changed(&self, event: &ProductChanged) -> Result<(), BusError> {
        self.bus.publish(event).await
    }
}
