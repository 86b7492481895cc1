//! StaffHub infrastructure layer.
//!
//! Adapters for the contracts defined in `staffhub-domain`: PostgreSQL
//! repositories (outbox, history, dead letters, employees), the NATS
//! transport, the outbox relay and the history projector. In-memory
//! implementations back tests and local development.

pub mod messaging;
pub mod persistence;
