//! Domain events for the HR backend.
//!
//! Events are immutable facts. Every variant carries its own identity
//! (`event_id`, generated at creation) and the moment it occurred; the
//! `event_id` doubles as the idempotency key throughout the pipeline.
//!
//! The set of variants is closed on purpose: consumers deserialize through
//! the serde tag and match exhaustively, so a renamed field is a compile
//! error here instead of a runtime lookup failure downstream.

use crate::outbox::AggregateType;
use crate::shared_kernel::{EmployeeId, EmployeeStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A domain event raised by business logic during a unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A new employee record was created
    EmployeeCreated {
        event_id: Uuid,
        employee_id: EmployeeId,
        name: String,
        email: String,
        occurred_at: DateTime<Utc>,
    },
    /// The employment status of an employee changed
    EmployeeStatusChanged {
        event_id: Uuid,
        employee_id: EmployeeId,
        old_status: EmployeeStatus,
        new_status: EmployeeStatus,
        occurred_at: DateTime<Utc>,
    },
    /// Profile fields of an employee were edited
    EmployeeUpdated {
        event_id: Uuid,
        employee_id: EmployeeId,
        changes: String,
        occurred_at: DateTime<Utc>,
    },
    /// An employee record was removed
    EmployeeDeleted {
        event_id: Uuid,
        employee_id: EmployeeId,
        occurred_at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Unique identity of the event, generated at creation.
    pub fn event_id(&self) -> Uuid {
        match self {
            DomainEvent::EmployeeCreated { event_id, .. }
            | DomainEvent::EmployeeStatusChanged { event_id, .. }
            | DomainEvent::EmployeeUpdated { event_id, .. }
            | DomainEvent::EmployeeDeleted { event_id, .. } => *event_id,
        }
    }

    /// When the event occurred.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::EmployeeCreated { occurred_at, .. }
            | DomainEvent::EmployeeStatusChanged { occurred_at, .. }
            | DomainEvent::EmployeeUpdated { occurred_at, .. }
            | DomainEvent::EmployeeDeleted { occurred_at, .. } => *occurred_at,
        }
    }

    /// Discriminator tag used for routing and serialization.
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::EmployeeCreated { .. } => "EmployeeCreated",
            DomainEvent::EmployeeStatusChanged { .. } => "EmployeeStatusChanged",
            DomainEvent::EmployeeUpdated { .. } => "EmployeeUpdated",
            DomainEvent::EmployeeDeleted { .. } => "EmployeeDeleted",
        }
    }

    /// Identity of the aggregate the event belongs to.
    pub fn aggregate_id(&self) -> Uuid {
        match self {
            DomainEvent::EmployeeCreated { employee_id, .. }
            | DomainEvent::EmployeeStatusChanged { employee_id, .. }
            | DomainEvent::EmployeeUpdated { employee_id, .. }
            | DomainEvent::EmployeeDeleted { employee_id, .. } => employee_id.as_uuid(),
        }
    }

    /// Kind of aggregate the event belongs to.
    pub fn aggregate_type(&self) -> AggregateType {
        match self {
            DomainEvent::EmployeeCreated { .. }
            | DomainEvent::EmployeeStatusChanged { .. }
            | DomainEvent::EmployeeUpdated { .. }
            | DomainEvent::EmployeeDeleted { .. } => AggregateType::Employee,
        }
    }

    /// Employee the event refers to, where applicable.
    pub fn employee_id(&self) -> EmployeeId {
        match self {
            DomainEvent::EmployeeCreated { employee_id, .. }
            | DomainEvent::EmployeeStatusChanged { employee_id, .. }
            | DomainEvent::EmployeeUpdated { employee_id, .. }
            | DomainEvent::EmployeeDeleted { employee_id, .. } => *employee_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created_event() -> DomainEvent {
        DomainEvent::EmployeeCreated {
            event_id: Uuid::new_v4(),
            employee_id: EmployeeId::new(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_event_type_tags() {
        let event = created_event();
        assert_eq!(event.event_type(), "EmployeeCreated");

        let change = DomainEvent::EmployeeStatusChanged {
            event_id: Uuid::new_v4(),
            employee_id: EmployeeId::new(),
            old_status: EmployeeStatus::Active,
            new_status: EmployeeStatus::Terminated,
            occurred_at: Utc::now(),
        };
        assert_eq!(change.event_type(), "EmployeeStatusChanged");
    }

    #[test]
    fn test_serde_roundtrip_preserves_identity() {
        let event = created_event();
        let json = serde_json::to_value(&event).unwrap();
        let back: DomainEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.event_id(), event.event_id());
        assert_eq!(back, event);
    }

    #[test]
    fn test_aggregate_identity() {
        let event = created_event();
        assert_eq!(event.aggregate_id(), event.employee_id().as_uuid());
        assert_eq!(event.aggregate_type(), AggregateType::Employee);
    }
}
