//! Transactional outbox: model, repository contract, dispatcher and retry
//! policy.

mod dead_letter;
mod dispatcher;
mod model;
mod repository;
mod retry;

pub use dead_letter::{DeadLetter, DeadLetterRepository};
pub use dispatcher::{DispatchReport, EventDispatcher};
pub use model::{AggregateType, OutboxError, OutboxMessage, OutboxStats, OutboxStatus};
pub use repository::OutboxRepository;
pub use retry::RetryPolicy;
