//! In-memory dead-letter repository for tests and local development.

use async_trait::async_trait;
use staffhub_domain::outbox::{DeadLetter, DeadLetterRepository, OutboxError};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryDeadLetterRepository {
    letters: Mutex<Vec<DeadLetter>>,
}

impl InMemoryDeadLetterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<DeadLetter> {
        self.letters.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeadLetterRepository for InMemoryDeadLetterRepository {
    async fn append(&self, dead_letter: &DeadLetter) -> Result<(), OutboxError> {
        self.letters.lock().unwrap().push(dead_letter.clone());
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<DeadLetter>, OutboxError> {
        let letters = self.letters.lock().unwrap();
        Ok(letters.iter().take(limit).cloned().collect())
    }
}
