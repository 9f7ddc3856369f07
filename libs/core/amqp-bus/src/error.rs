//! Error types for the AMQP bus.

use thiserror::Error;

/// Errors raised by the publisher and consumer.
#[derive(Debug, Error)]
pub enum BusError {
    /// Underlying AMQP client error (connection, channel, declare, publish)
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),

    /// Message could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Message handler failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// Connection could not be established within the retry budget
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}
