//! History projector: consumes published events into the history log.
//!
//! Delivery is at least once, so the projector is idempotent: the history
//! row's primary key is the event id and a redelivered message lands on the
//! existing row. Messages that cannot be deserialized are poison; they go
//! to the dead-letter store and are acked so they stop blocking the
//! consumer. A storage failure is transient and the message stays unacked
//! for redelivery.

use crate::messaging::describe::EventDescriber;
use futures::StreamExt;
use serde_json::Value;
use staffhub_domain::events::DomainEvent;
use staffhub_domain::history::{HistoryEvent, HistoryRepository};
use staffhub_domain::outbox::{DeadLetter, DeadLetterRepository};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// What to do with a consumed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Processed (or dead-lettered): remove from the queue.
    Ack,
    /// Transient failure: leave unacked for redelivery.
    Retry,
}

/// Projects domain events into the employee history log.
pub struct HistoryProjector {
    history: Arc<dyn HistoryRepository>,
    dead_letters: Arc<dyn DeadLetterRepository>,
    describer: EventDescriber,
}

impl HistoryProjector {
    pub fn new(
        history: Arc<dyn HistoryRepository>,
        dead_letters: Arc<dyn DeadLetterRepository>,
        describer: EventDescriber,
    ) -> Self {
        Self {
            history,
            dead_letters,
            describer,
        }
    }

    /// Handle one message payload and decide its fate.
    pub async fn process(&self, payload: &[u8]) -> Disposition {
        let event: DomainEvent = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(e) => {
                return self.dead_letter(payload, &e.to_string()).await;
            }
        };

        let entry = HistoryEvent {
            id: event.event_id(),
            employee_id: event.aggregate_id(),
            event_type: event.event_type().to_string(),
            description: self.describer.describe(&event),
            occurred_on: event.occurred_at(),
            event_data: match serde_json::to_value(&event) {
                Ok(value) => value,
                Err(e) => {
                    return self.dead_letter(payload, &e.to_string()).await;
                }
            },
        };

        match self.history.upsert(&entry).await {
            Ok(()) => {
                debug!(
                    event_id = %entry.id,
                    event_type = entry.event_type,
                    "Projected event into history"
                );
                Disposition::Ack
            }
            Err(e) => {
                warn!(
                    event_id = %entry.id,
                    error = %e,
                    "History write failed, leaving message for redelivery"
                );
                Disposition::Retry
            }
        }
    }

    async fn dead_letter(&self, payload: &[u8], error: &str) -> Disposition {
        let (message_id, event_type) = identify_payload(payload);
        let letter = DeadLetter::new(message_id, event_type, payload.to_vec(), error.to_string());

        match self.dead_letters.append(&letter).await {
            Ok(()) => {
                error!(
                    message_id = %letter.message_id,
                    error = error,
                    "Poison message moved to dead-letter store"
                );
                Disposition::Ack
            }
            Err(e) => {
                // Cannot park it anywhere; keep it on the queue.
                error!(error = %e, "Failed to store dead letter");
                Disposition::Retry
            }
        }
    }

    /// Drain a NATS consumer until shutdown. Meant for a background task.
    pub async fn run(
        &self,
        consumer: async_nats::jetstream::consumer::PullConsumer,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        info!("Starting history projector");

        let mut messages = match consumer.messages().await {
            Ok(messages) => messages,
            Err(e) => {
                error!(error = %e, "Failed to open consumer message stream");
                return;
            }
        };

        loop {
            tokio::select! {
                next = messages.next() => {
                    match next {
                        Some(Ok(message)) => {
                            match self.process(&message.payload).await {
                                Disposition::Ack => {
                                    if let Err(e) = message.ack().await {
                                        warn!(error = %e, "Failed to ack message");
                                    }
                                }
                                Disposition::Retry => {
                                    debug!("Leaving message unacked for redelivery");
                                }
                            }
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "Error receiving message");
                        }
                        None => break,
                    }
                }
                _ = shutdown.recv() => {
                    info!("History projector shutting down");
                    break;
                }
            }
        }
    }
}

/// Best-effort extraction of identity from an unparseable payload.
fn identify_payload(payload: &[u8]) -> (Uuid, String) {
    let Ok(value) = serde_json::from_slice::<Value>(payload) else {
        return (Uuid::nil(), "unknown".to_string());
    };

    // Externally tagged: {"EmployeeCreated": {"event_id": ...}}
    let Some((tag, body)) = value.as_object().and_then(|o| o.iter().next()) else {
        return (Uuid::nil(), "unknown".to_string());
    };

    let id = body
        .get("event_id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or(Uuid::nil());

    (id, tag.clone())
}
