//! Commit-triggered event dispatcher.
//!
//! Moves events from a drained unit-of-work buffer into the outbox store.
//! Runs strictly after the business transaction has committed, so a dispatch
//! failure can never roll back business state; whatever was written durably
//! is the relay's problem, whatever was not is an operational alert.

use crate::event_buffer::EventBuffer;
use crate::outbox::{OutboxError, OutboxMessage, OutboxRepository};
use std::sync::Arc;
use tracing::{debug, error};

/// Outcome of one dispatch pass over a drained buffer.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Messages durably appended to the outbox
    pub appended: usize,
    /// Events already present (duplicate id), skipped as already-dispatched
    pub duplicates: usize,
    /// Events that could not be recorded at all
    pub failed: usize,
}

impl DispatchReport {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Dispatcher invoked by the unit of work's commit signal.
pub struct EventDispatcher {
    outbox: Arc<dyn OutboxRepository>,
}

impl EventDispatcher {
    pub fn new(outbox: Arc<dyn OutboxRepository>) -> Self {
        Self { outbox }
    }

    /// Drain the buffer and append one outbox message per event, in raising
    /// order. A failure on one event is isolated: it is logged and the
    /// remaining events are still attempted.
    pub async fn dispatch(&self, buffer: &EventBuffer) -> DispatchReport {
        let events = buffer.drain();
        if events.is_empty() {
            return DispatchReport::default();
        }

        let mut report = DispatchReport::default();
        for event in &events {
            let message = match OutboxMessage::from_event(event) {
                Ok(message) => message,
                Err(e) => {
                    error!(
                        event_type = event.event_type(),
                        event_id = %event.event_id(),
                        error = %e,
                        "Failed to serialize domain event for outbox"
                    );
                    report.failed += 1;
                    continue;
                }
            };

            match self.outbox.append(&message).await {
                Ok(()) => {
                    debug!(
                        event_type = message.event_type,
                        event_id = %message.id,
                        "Event recorded in outbox"
                    );
                    report.appended += 1;
                }
                Err(OutboxError::DuplicateEventId(id)) => {
                    debug!(event_id = %id, "Outbox row already exists, skipping");
                    report.duplicates += 1;
                }
                Err(e) => {
                    // The business transaction already committed; this is a
                    // durability gap that operations must notice.
                    error!(
                        event_type = message.event_type,
                        event_id = %message.id,
                        error = %e,
                        "Failed to record committed event in outbox"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}
