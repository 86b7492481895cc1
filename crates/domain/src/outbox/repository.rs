//! Outbox repository contract.

use crate::outbox::{OutboxError, OutboxMessage, OutboxStats, OutboxStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Durable store of outbox messages.
///
/// `append` is called by the dispatcher after the business transaction has
/// committed; everything else belongs to the relay. Rows are only ever
/// mutated through `claim`/`mark_published`/`mark_failed`, and a published
/// row is terminal (retained for audit, never deleted by the pipeline).
#[async_trait]
pub trait OutboxRepository: Send + Sync {
    /// Insert a message with `status = PENDING`, `retry_attempts = 0` and
    /// `next_attempt_at = now`.
    ///
    /// # Errors
    /// * `OutboxError::DuplicateEventId` if a row with the same id already
    ///   exists. Callers treat this as already-dispatched and move on.
    async fn append(&self, message: &OutboxMessage) -> Result<(), OutboxError>;

    /// Messages whose status is in `statuses` and whose `next_attempt_at`
    /// is strictly before `before`, oldest `occurred_on` first, at most
    /// `limit` rows.
    async fn select_due(
        &self,
        statuses: &[OutboxStatus],
        before: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<OutboxMessage>, OutboxError>;

    /// Assert time-bounded ownership of a message before publishing.
    ///
    /// Atomically moves `next_attempt_at` to `lease_until` iff the row is
    /// still due (status PENDING or FAILED, `next_attempt_at <= now`).
    /// Returns `false` when another worker won the race; the caller skips
    /// the message. A worker that dies mid-publish simply lets the lease
    /// lapse, after which the row is due again.
    async fn claim(&self, id: Uuid, lease_until: DateTime<Utc>) -> Result<bool, OutboxError>;

    /// Transition PENDING/FAILED -> PUBLISHED and set `processed_at`.
    async fn mark_published(
        &self,
        id: Uuid,
        processed_at: DateTime<Utc>,
    ) -> Result<(), OutboxError>;

    /// Record a failed publish attempt: bump the retry counter and schedule
    /// the next attempt. `next_attempt_at` must be strictly later than the
    /// previous value (backoff).
    ///
    /// Only applies while the row is still PENDING or FAILED. Returns
    /// `false` when it is not, i.e. a worker whose lease lapsed mid-publish
    /// reports a failure after another worker already published the row; a
    /// PUBLISHED row never regresses.
    async fn mark_failed(
        &self,
        id: Uuid,
        next_attempt_at: DateTime<Utc>,
        retry_attempts: i32,
        error: &str,
    ) -> Result<bool, OutboxError>;

    /// Number of messages still pending, for monitoring.
    async fn count_pending(&self) -> Result<u64, OutboxError>;

    /// Counts by status, for monitoring.
    async fn stats(&self) -> Result<OutboxStats, OutboxError>;

    /// Fetch a single message by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OutboxMessage>, OutboxError>;
}
