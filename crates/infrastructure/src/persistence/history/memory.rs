//! In-memory history repository for tests and local development.

use async_trait::async_trait;
use staffhub_domain::history::{HistoryEvent, HistoryRepository};
use staffhub_domain::outbox::OutboxError;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryHistoryRepository {
    events: Mutex<Vec<HistoryEvent>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<HistoryEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn upsert(&self, event: &HistoryEvent) -> Result<(), OutboxError> {
        let mut events = self.events.lock().unwrap();
        // Same id means same originating event; redelivery collapses here.
        if events.iter().any(|e| e.id == event.id) {
            return Ok(());
        }
        events.push(event.clone());
        Ok(())
    }

    async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<HistoryEvent>, OutboxError> {
        let mut rows: Vec<HistoryEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.occurred_on);
        Ok(rows)
    }

    async fn count(&self) -> Result<u64, OutboxError> {
        Ok(self.events.lock().unwrap().len() as u64)
    }
}
