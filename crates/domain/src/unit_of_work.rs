//! Unit of work: the scope whose effects commit or abort as a whole.
//!
//! The unit of work owns its event buffer, which ties the buffer's lifetime
//! to exactly one logical operation. The dispatcher only ever runs from
//! `commit`; dropping an uncommitted unit of work discards the buffered
//! events, so an aborted transaction can never produce outbox rows.

use crate::event_buffer::EventBuffer;
use crate::outbox::{DispatchReport, EventDispatcher};
use tracing::warn;

/// One business operation's atomic scope.
pub struct UnitOfWork {
    buffer: EventBuffer,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self {
            buffer: EventBuffer::new(),
        }
    }

    /// Handle business logic uses to raise events inside this scope.
    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    /// Signal that the business transaction committed durably. Runs the
    /// dispatcher over the buffered events; consuming `self` makes a second
    /// commit unrepresentable.
    pub async fn commit(self, dispatcher: &EventDispatcher) -> DispatchReport {
        dispatcher.dispatch(&self.buffer).await
    }

    /// Signal that the business transaction aborted. Buffered events are
    /// discarded and never reach the outbox.
    pub fn abort(self) {
        let discarded = self.buffer.drain();
        if !discarded.is_empty() {
            warn!(
                count = discarded.len(),
                "Unit of work aborted, discarding buffered events"
            );
        }
    }
}

impl Default for UnitOfWork {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DomainEvent;
    use crate::outbox::{
        OutboxError, OutboxMessage, OutboxRepository, OutboxStats, OutboxStatus,
    };
    use crate::shared_kernel::EmployeeId;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    struct RecordingOutbox {
        messages: Mutex<Vec<OutboxMessage>>,
    }

    impl RecordingOutbox {
        fn new() -> Self {
            Self {
                messages: Mutex::new(Vec::new()),
            }
        }

        fn ids(&self) -> Vec<Uuid> {
            self.messages.lock().unwrap().iter().map(|m| m.id).collect()
        }
    }

    #[async_trait]
    impl OutboxRepository for RecordingOutbox {
        async fn append(&self, message: &OutboxMessage) -> Result<(), OutboxError> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn select_due(
            &self,
            _statuses: &[OutboxStatus],
            _before: DateTime<Utc>,
            _limit: usize,
        ) -> Result<Vec<OutboxMessage>, OutboxError> {
            Ok(Vec::new())
        }

        async fn claim(&self, _id: Uuid, _lease_until: DateTime<Utc>) -> Result<bool, OutboxError> {
            Ok(true)
        }

        async fn mark_published(
            &self,
            _id: Uuid,
            _processed_at: DateTime<Utc>,
        ) -> Result<(), OutboxError> {
            Ok(())
        }

        async fn mark_failed(
            &self,
            _id: Uuid,
            _next_attempt_at: DateTime<Utc>,
            _retry_attempts: i32,
            _error: &str,
        ) -> Result<bool, OutboxError> {
            Ok(true)
        }

        async fn count_pending(&self) -> Result<u64, OutboxError> {
            Ok(self.messages.lock().unwrap().len() as u64)
        }

        async fn stats(&self) -> Result<OutboxStats, OutboxError> {
            Ok(OutboxStats::default())
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<OutboxMessage>, OutboxError> {
            Ok(None)
        }
    }

    fn created_event() -> DomainEvent {
        DomainEvent::EmployeeCreated {
            event_id: Uuid::new_v4(),
            employee_id: EmployeeId::new(),
            name: "Margaret Hamilton".to_string(),
            email: "margaret@example.com".to_string(),
            occurred_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_commit_dispatches_buffered_events() {
        let repo = Arc::new(RecordingOutbox::new());
        let dispatcher = EventDispatcher::new(repo.clone());

        let uow = UnitOfWork::new();
        let event = created_event();
        uow.buffer().record(event.clone());

        let report = uow.commit(&dispatcher).await;
        assert_eq!(report.appended, 1);
        assert_eq!(repo.ids(), vec![event.event_id()]);
    }

    #[tokio::test]
    async fn test_abort_never_reaches_the_outbox() {
        let repo = Arc::new(RecordingOutbox::new());
        let _dispatcher = EventDispatcher::new(repo.clone());

        let uow = UnitOfWork::new();
        uow.buffer().record(created_event());
        uow.abort();

        assert!(repo.ids().is_empty());
    }

    #[tokio::test]
    async fn test_drop_without_commit_never_reaches_the_outbox() {
        let repo = Arc::new(RecordingOutbox::new());
        let _dispatcher = EventDispatcher::new(repo.clone());

        {
            let uow = UnitOfWork::new();
            uow.buffer().record(created_event());
            // dropped here without commit
        }

        assert!(repo.ids().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_units_of_work_are_isolated() {
        let uow_a = UnitOfWork::new();
        let uow_b = UnitOfWork::new();

        uow_a.buffer().record(created_event());

        assert!(uow_b.buffer().peek().is_empty());
        assert_eq!(uow_a.buffer().peek().len(), 1);
    }
}
