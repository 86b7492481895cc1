//! Unit-of-work scoped event buffer.
//!
//! Collects domain events raised by business logic during one unit of work,
//! in raising order. The buffer is an explicit handle owned by the unit of
//! work, never a thread-local or a global: two concurrent units of work hold
//! two distinct buffers, so isolation is structural.

use crate::events::DomainEvent;
use std::sync::Mutex;

/// Accumulator for events raised during a single unit of work.
///
/// `record` appends, `drain` hands the list to the dispatcher exactly once.
/// Interior mutability lets the buffer be shared between the business
/// service and the dispatcher without threading `&mut` through every call.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Mutex<Vec<DomainEvent>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Append an event to the buffer in raising order.
    pub fn record(&self, event: DomainEvent) {
        self.events
            .lock()
            .expect("event buffer lock poisoned")
            .push(event);
    }

    /// Return the accumulated events in insertion order and clear the
    /// buffer atomically. A repeated drain without intervening records
    /// returns an empty list.
    pub fn drain(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut *self.events.lock().expect("event buffer lock poisoned"))
    }

    /// Read-only snapshot without clearing. Diagnostics and tests only.
    pub fn peek(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .expect("event buffer lock poisoned")
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("event buffer lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_kernel::{EmployeeId, EmployeeStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn status_event() -> DomainEvent {
        DomainEvent::EmployeeStatusChanged {
            event_id: Uuid::new_v4(),
            employee_id: EmployeeId::new(),
            old_status: EmployeeStatus::Active,
            new_status: EmployeeStatus::OnLeave,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_drain_returns_events_in_insertion_order() {
        let buffer = EventBuffer::new();
        let first = status_event();
        let second = status_event();
        buffer.record(first.clone());
        buffer.record(second.clone());

        let drained = buffer.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].event_id(), first.event_id());
        assert_eq!(drained[1].event_id(), second.event_id());
    }

    #[test]
    fn test_repeated_drain_is_empty() {
        let buffer = EventBuffer::new();
        buffer.record(status_event());

        assert_eq!(buffer.drain().len(), 1);
        assert!(buffer.drain().is_empty());
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn test_peek_does_not_clear() {
        let buffer = EventBuffer::new();
        buffer.record(status_event());

        assert_eq!(buffer.peek().len(), 1);
        assert_eq!(buffer.peek().len(), 1);
        assert_eq!(buffer.drain().len(), 1);
    }

    #[test]
    fn test_buffers_are_isolated_between_units_of_work() {
        let buffer_a = EventBuffer::new();
        let buffer_b = EventBuffer::new();

        buffer_a.record(status_event());

        assert!(buffer_b.peek().is_empty());
        assert!(buffer_b.drain().is_empty());
        assert_eq!(buffer_a.len(), 1);
    }
}
