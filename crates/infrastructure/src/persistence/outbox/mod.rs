//! Outbox store implementations.

mod memory;
mod postgres;

pub use memory::InMemoryOutboxRepository;
pub use postgres::PostgresOutboxRepository;
