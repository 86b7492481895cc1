//! StaffHub application layer.
//!
//! Orchestrates business operations: each service call opens a unit of work,
//! runs the aggregate logic, persists the record, and commits, which hands
//! the buffered events to the outbox dispatcher.

pub mod employees;
pub mod filter;

pub use employees::EmployeeService;
pub use filter::EmployeeFilter;
