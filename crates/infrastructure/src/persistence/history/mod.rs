//! History projection storage.

mod memory;
mod postgres;

pub use memory::InMemoryHistoryRepository;
pub use postgres::PostgresHistoryRepository;
