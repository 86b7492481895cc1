//! StaffHub domain layer.
//!
//! Holds the domain model for the HR record-keeping backend and the core of
//! the transactional outbox pipeline: domain events, the unit-of-work event
//! buffer, the commit-triggered dispatcher and the outbox/history contracts
//! implemented by the infrastructure layer.

pub mod employees;
pub mod event_bus;
pub mod event_buffer;
pub mod events;
pub mod history;
pub mod outbox;
pub mod shared_kernel;
pub mod unit_of_work;

pub use events::DomainEvent;
pub use shared_kernel::{DepartmentId, DomainError, EmployeeId, EmployeeStatus, PositionId};
