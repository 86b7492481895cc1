//! In-memory outbox repository for tests and local development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use staffhub_domain::outbox::{
    OutboxError, OutboxMessage, OutboxRepository, OutboxStats, OutboxStatus,
};
use std::sync::Mutex;
use uuid::Uuid;

/// Mutex-guarded vector with the same observable semantics as the
/// PostgreSQL repository, including claim races.
#[derive(Default)]
pub struct InMemoryOutboxRepository {
    messages: Mutex<Vec<OutboxMessage>>,
}

impl InMemoryOutboxRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row, for assertions.
    pub fn all(&self) -> Vec<OutboxMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutboxRepository for InMemoryOutboxRepository {
    async fn append(&self, message: &OutboxMessage) -> Result<(), OutboxError> {
        let mut messages = self.messages.lock().unwrap();
        if messages.iter().any(|m| m.id == message.id) {
            return Err(OutboxError::DuplicateEventId(message.id));
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn select_due(
        &self,
        statuses: &[OutboxStatus],
        before: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OutboxMessage>, OutboxError> {
        let messages = self.messages.lock().unwrap();
        let mut due: Vec<OutboxMessage> = messages
            .iter()
            .filter(|m| statuses.contains(&m.status) && m.next_attempt_at < before)
            .cloned()
            .collect();
        due.sort_by_key(|m| m.occurred_on);
        due.truncate(limit);
        Ok(due)
    }

    async fn claim(&self, id: Uuid, lease_until: DateTime<Utc>) -> Result<bool, OutboxError> {
        let mut messages = self.messages.lock().unwrap();
        let now = Utc::now();
        match messages.iter_mut().find(|m| m.id == id) {
            Some(message)
                if matches!(message.status, OutboxStatus::Pending | OutboxStatus::Failed)
                    && message.next_attempt_at <= now =>
            {
                message.next_attempt_at = lease_until;
                Ok(true)
            }
            // Not due, already published, or unknown id: same 0-rows
            // outcome as the conditional UPDATE.
            _ => Ok(false),
        }
    }

    async fn mark_published(
        &self,
        id: Uuid,
        processed_at: DateTime<Utc>,
    ) -> Result<(), OutboxError> {
        let mut messages = self.messages.lock().unwrap();
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(OutboxError::NotFound(id))?;
        message.status = OutboxStatus::Published;
        message.processed_at = Some(processed_at);
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        next_attempt_at: DateTime<Utc>,
        retry_attempts: i32,
        error: &str,
    ) -> Result<bool, OutboxError> {
        let mut messages = self.messages.lock().unwrap();
        match messages.iter_mut().find(|m| m.id == id) {
            Some(message)
                if matches!(message.status, OutboxStatus::Pending | OutboxStatus::Failed) =>
            {
                message.status = OutboxStatus::Failed;
                message.retry_attempts = retry_attempts;
                message.next_attempt_at = next_attempt_at;
                message.last_error = Some(error.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_pending(&self) -> Result<u64, OutboxError> {
        let messages = self.messages.lock().unwrap();
        Ok(messages.iter().filter(|m| m.is_pending()).count() as u64)
    }

    async fn stats(&self) -> Result<OutboxStats, OutboxError> {
        let messages = self.messages.lock().unwrap();
        let now = Utc::now();
        let oldest_pending_age_seconds = messages
            .iter()
            .filter(|m| m.is_pending())
            .map(|m| (now - m.occurred_on).num_seconds())
            .max();
        Ok(OutboxStats {
            pending_count: messages.iter().filter(|m| m.is_pending()).count() as u64,
            published_count: messages.iter().filter(|m| m.is_published()).count() as u64,
            failed_count: messages
                .iter()
                .filter(|m| m.status == OutboxStatus::Failed)
                .count() as u64,
            oldest_pending_age_seconds,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OutboxMessage>, OutboxError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }
}
