//! Employee record storage.

mod memory;
mod postgres;

pub use memory::InMemoryEmployeeRepository;
pub use postgres::PostgresEmployeeRepository;
