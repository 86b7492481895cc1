//! Dead-letter records for messages the consumer cannot process.

use crate::outbox::OutboxError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A message diverted out of the delivery loop.
///
/// Dead-lettering ends redelivery for poison messages (unparseable payloads,
/// repeated projection failures) without losing them: the raw payload is
/// kept for manual inspection and replay.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    pub id: Uuid,
    /// Id of the outbox message / event that could not be processed
    pub message_id: Uuid,
    pub event_type: String,
    pub payload: Vec<u8>,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

impl DeadLetter {
    pub fn new(message_id: Uuid, event_type: String, payload: Vec<u8>, error: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            message_id,
            event_type,
            payload,
            error,
            failed_at: Utc::now(),
        }
    }
}

/// Store for dead letters.
#[async_trait]
pub trait DeadLetterRepository: Send + Sync {
    async fn append(&self, dead_letter: &DeadLetter) -> Result<(), OutboxError>;

    async fn list(&self, limit: usize) -> Result<Vec<DeadLetter>, OutboxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_letter_keeps_raw_payload() {
        let payload = b"not json at all".to_vec();
        let letter = DeadLetter::new(
            Uuid::new_v4(),
            "EmployeeCreated".to_string(),
            payload.clone(),
            "deserialization failed".to_string(),
        );
        assert_eq!(letter.payload, payload);
        assert_ne!(letter.id, letter.message_id);
    }
}
