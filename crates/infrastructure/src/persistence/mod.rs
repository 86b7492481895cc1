//! Storage adapters.

pub mod dead_letter;
pub mod employees;
pub mod history;
pub mod outbox;
