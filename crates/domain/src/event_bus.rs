//! Transport boundary for the relay.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventBusError {
    #[error("Failed to publish event: {0}")]
    PublishError(String),
    #[error("Failed to subscribe: {0}")]
    SubscribeError(String),
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Publishing side of the message transport.
///
/// The relay hands over `(routing key, serialized payload)` pairs; the
/// routing key is derived from the event type, one subject per event kind.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, routing_key: &str, payload: &[u8]) -> Result<(), EventBusError>;
}
