//! Outbox message model used by the transactional outbox pipeline.

use crate::events::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of an outbox message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboxStatus {
    /// Recorded but not yet relayed to the transport
    Pending,
    /// Successfully handed to the transport
    Published,
    /// Last publish attempt failed; due again at `next_attempt_at`
    Failed,
}

impl std::fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutboxStatus::Pending => write!(f, "PENDING"),
            OutboxStatus::Published => write!(f, "PUBLISHED"),
            OutboxStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Error types for outbox operations
#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("Duplicate event id: {0}")]
    DuplicateEventId(Uuid),

    #[error("Message not found: {0}")]
    NotFound(Uuid),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Type of aggregate an outbox message originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateType {
    Employee,
    Department,
    Position,
}

impl std::fmt::Display for AggregateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateType::Employee => write!(f, "EMPLOYEE"),
            AggregateType::Department => write!(f, "DEPARTMENT"),
            AggregateType::Position => write!(f, "POSITION"),
        }
    }
}

impl AggregateType {
    pub fn parse(s: &str) -> Result<Self, OutboxError> {
        match s {
            "EMPLOYEE" => Ok(AggregateType::Employee),
            "DEPARTMENT" => Ok(AggregateType::Department),
            "POSITION" => Ok(AggregateType::Position),
            _ => Err(OutboxError::Storage {
                message: format!("Invalid aggregate type: {}", s),
            }),
        }
    }
}

/// A durable outbox message.
///
/// `id` equals the originating event's `event_id`; that equality is the
/// deduplication key across dispatch, relay and projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub aggregate_type: AggregateType,
    pub aggregate_id: Uuid,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: OutboxStatus,
    pub retry_attempts: i32,
    pub next_attempt_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl OutboxMessage {
    /// Build a pending message from a domain event, due immediately.
    pub fn from_event(event: &DomainEvent) -> Result<Self, OutboxError> {
        let payload = serde_json::to_value(event)?;
        let now = Utc::now();
        Ok(Self {
            id: event.event_id(),
            occurred_on: event.occurred_at(),
            aggregate_type: event.aggregate_type(),
            aggregate_id: event.aggregate_id(),
            event_type: event.event_type().to_string(),
            payload,
            status: OutboxStatus::Pending,
            retry_attempts: 0,
            next_attempt_at: now,
            processed_at: None,
            last_error: None,
        })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, OutboxStatus::Pending)
    }

    pub fn is_published(&self) -> bool {
        matches!(self.status, OutboxStatus::Published)
    }

    /// Whether the message has exhausted its publish attempts.
    pub fn is_exhausted(&self, max_attempts: i32) -> bool {
        matches!(self.status, OutboxStatus::Failed) && self.retry_attempts >= max_attempts
    }

    /// Age of the message relative to when the event occurred.
    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.occurred_on)
    }
}

/// Counts by status, for monitoring.
#[derive(Debug, Clone, Default)]
pub struct OutboxStats {
    pub pending_count: u64,
    pub published_count: u64,
    pub failed_count: u64,
    pub oldest_pending_age_seconds: Option<i64>,
}

impl OutboxStats {
    pub fn total(&self) -> u64 {
        self.pending_count + self.published_count + self.failed_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_kernel::EmployeeId;

    fn created_event() -> DomainEvent {
        DomainEvent::EmployeeCreated {
            event_id: Uuid::new_v4(),
            employee_id: EmployeeId::new(),
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_event_uses_event_identity() {
        let event = created_event();
        let message = OutboxMessage::from_event(&event).unwrap();

        assert_eq!(message.id, event.event_id());
        assert_eq!(message.aggregate_id, event.aggregate_id());
        assert_eq!(message.aggregate_type, AggregateType::Employee);
        assert_eq!(message.event_type, "EmployeeCreated");
        assert_eq!(message.status, OutboxStatus::Pending);
        assert_eq!(message.retry_attempts, 0);
        assert!(message.processed_at.is_none());
    }

    #[test]
    fn test_payload_deserializes_back_to_event() {
        let event = created_event();
        let message = OutboxMessage::from_event(&event).unwrap();

        let back: DomainEvent = serde_json::from_value(message.payload).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_exhaustion_requires_failed_status() {
        let event = created_event();
        let mut message = OutboxMessage::from_event(&event).unwrap();

        message.retry_attempts = 5;
        assert!(!message.is_exhausted(5), "pending is never exhausted");

        message.status = OutboxStatus::Failed;
        assert!(message.is_exhausted(5));
        assert!(!message.is_exhausted(6));
    }

    #[test]
    fn test_aggregate_type_parse() {
        assert_eq!(
            AggregateType::parse("EMPLOYEE").unwrap(),
            AggregateType::Employee
        );
        assert!(AggregateType::parse("UNKNOWN").is_err());
    }
}
