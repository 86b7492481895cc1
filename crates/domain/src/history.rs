//! Consumer-side history projection: model and storage contract.

use crate::outbox::OutboxError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One row of the append-only employee history log.
///
/// `id` equals the originating event id; redelivered messages therefore
/// collapse onto the same row instead of duplicating it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEvent {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub event_type: String,
    /// Human-readable rendering of the event, derived per variant
    pub description: String,
    pub occurred_on: DateTime<Utc>,
    /// Raw payload, kept for audit and replay
    pub event_data: serde_json::Value,
}

/// Store for the history projection.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Insert the row if no row with the same id exists; otherwise a no-op.
    /// This is what makes consumption idempotent under redelivery.
    async fn upsert(&self, event: &HistoryEvent) -> Result<(), OutboxError>;

    /// History rows for one employee, oldest first.
    async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<HistoryEvent>, OutboxError>;

    async fn count(&self) -> Result<u64, OutboxError>;
}
