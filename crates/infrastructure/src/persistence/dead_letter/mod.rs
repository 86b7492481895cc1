//! Dead-letter storage.

mod memory;
mod postgres;

pub use memory::InMemoryDeadLetterRepository;
pub use postgres::PostgresDeadLetterRepository;
