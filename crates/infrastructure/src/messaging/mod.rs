//! Messaging: NATS transport, the outbox relay and the history projector.

pub mod describe;
pub mod nats;
pub mod projector;
pub mod relay;

pub use describe::EventDescriber;
pub use nats::{NatsConfig, NatsEventBus};
pub use projector::{Disposition, HistoryProjector};
pub use relay::{OutboxRelay, RelayConfig, RelayMetrics};
