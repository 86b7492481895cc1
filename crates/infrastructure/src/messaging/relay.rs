//! Outbox relay: polls due messages and publishes them to the event bus.
//!
//! Several relay instances may run against the same outbox table. Each
//! message is claimed with a short lease before publishing, so at most one
//! worker handles it at a time; a crashed worker's lease simply expires and
//! the message becomes due again. Publishing before marking means delivery
//! is at least once, never at most once.

use crate::messaging::nats::subject_for;
use chrono::{Duration as ChronoDuration, Utc};
use staffhub_domain::event_bus::EventBus;
use staffhub_domain::outbox::{OutboxMessage, OutboxRepository, OutboxStatus, RetryPolicy};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

/// Configuration for the relay loop.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// How often to poll the outbox for due messages
    pub poll_interval: Duration,
    /// Maximum number of messages handled per batch
    pub batch_size: usize,
    /// How long a claim shields a message from other workers
    pub lease: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            batch_size: 50,
            lease: Duration::from_secs(30),
        }
    }
}

/// Counters exposed by the relay.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    published_total: AtomicU64,
    failed_total: AtomicU64,
    exhausted_total: AtomicU64,
    batches_total: AtomicU64,
}

impl RelayMetrics {
    pub fn published(&self) -> u64 {
        self.published_total.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed_total.load(Ordering::Relaxed)
    }

    pub fn exhausted(&self) -> u64 {
        self.exhausted_total.load(Ordering::Relaxed)
    }

    pub fn batches(&self) -> u64 {
        self.batches_total.load(Ordering::Relaxed)
    }
}

/// Moves committed outbox messages onto the event bus.
pub struct OutboxRelay {
    outbox: Arc<dyn OutboxRepository>,
    bus: Arc<dyn EventBus>,
    config: RelayConfig,
    policy: RetryPolicy,
    metrics: Arc<RelayMetrics>,
    shutdown: broadcast::Sender<()>,
}

impl OutboxRelay {
    pub fn new(
        outbox: Arc<dyn OutboxRepository>,
        bus: Arc<dyn EventBus>,
        config: RelayConfig,
        policy: RetryPolicy,
    ) -> Self {
        let (shutdown, _) = broadcast::channel(1);
        Self {
            outbox,
            bus,
            config,
            policy,
            metrics: Arc::new(RelayMetrics::default()),
            shutdown,
        }
    }

    pub fn metrics(&self) -> Arc<RelayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Signal the relay loop to stop after the current batch.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(());
    }

    /// Run the poll loop until shutdown. Meant for a background task.
    pub async fn run(&self) {
        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            batch_size = self.config.batch_size,
            max_attempts = self.policy.max_attempts,
            "Starting outbox relay"
        );

        let mut ticker = interval(self.config.poll_interval);
        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.process_batch().await;
                }
                _ = shutdown_rx.recv() => {
                    info!("Outbox relay shutting down");
                    break;
                }
            }
        }
    }

    /// Fetch due messages and publish each in turn.
    pub async fn process_batch(&self) {
        self.metrics.batches_total.fetch_add(1, Ordering::Relaxed);

        let now = Utc::now();
        let due = match self
            .outbox
            .select_due(
                &[OutboxStatus::Pending, OutboxStatus::Failed],
                now,
                self.config.batch_size,
            )
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                error!(error = %e, "Failed to fetch due outbox messages");
                return;
            }
        };

        if due.is_empty() {
            return;
        }

        debug!(count = due.len(), "Processing due outbox messages");
        for message in due {
            self.process_message(message).await;
        }
    }

    async fn process_message(&self, message: OutboxMessage) {
        if message.is_exhausted(self.policy.max_attempts) {
            // Left FAILED for the operator; nothing more to do here.
            return;
        }

        let now = Utc::now();
        let lease_until =
            now + ChronoDuration::from_std(self.config.lease).unwrap_or(ChronoDuration::seconds(30));

        match self.outbox.claim(message.id, lease_until).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(message_id = %message.id, "Message claimed by another worker");
                return;
            }
            Err(e) => {
                error!(message_id = %message.id, error = %e, "Failed to claim message");
                return;
            }
        }

        let payload = match serde_json::to_vec(&message.payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.record_failure(&message, &e.to_string()).await;
                return;
            }
        };

        let subject = subject_for(&message.event_type);
        match self.bus.publish(&subject, &payload).await {
            Ok(()) => {
                if let Err(e) = self.outbox.mark_published(message.id, Utc::now()).await {
                    // The publish went out; on restart the message is
                    // re-published and deduplicated by the consumer.
                    error!(message_id = %message.id, error = %e, "Failed to mark message published");
                    return;
                }
                self.metrics.published_total.fetch_add(1, Ordering::Relaxed);
                debug!(
                    message_id = %message.id,
                    event_type = message.event_type,
                    subject = subject,
                    "Message published"
                );
            }
            Err(e) => {
                self.record_failure(&message, &e.to_string()).await;
            }
        }
    }

    async fn record_failure(&self, message: &OutboxMessage, error: &str) {
        let attempts = message.retry_attempts + 1;
        let now = Utc::now();

        let exhausted = self.policy.is_exhausted(attempts);
        let next_attempt_at = if exhausted {
            // Park far in the future so the poller stops picking it up.
            now + ChronoDuration::days(365 * 100)
        } else {
            self.policy.next_attempt_at(now, attempts)
        };

        match self
            .outbox
            .mark_failed(message.id, next_attempt_at, attempts, error)
            .await
        {
            Ok(true) if exhausted => {
                self.metrics.exhausted_total.fetch_add(1, Ordering::Relaxed);
                error!(
                    message_id = %message.id,
                    event_type = message.event_type,
                    attempts = attempts,
                    error = error,
                    "Giving up on message after exhausting retries"
                );
            }
            Ok(true) => {
                self.metrics.failed_total.fetch_add(1, Ordering::Relaxed);
                warn!(
                    message_id = %message.id,
                    event_type = message.event_type,
                    attempts = attempts,
                    next_attempt_at = %next_attempt_at,
                    error = error,
                    "Publish failed, scheduling retry"
                );
            }
            Ok(false) => {
                // The row left PENDING/FAILED while this worker held a
                // lapsed lease; another worker already published it.
                debug!(
                    message_id = %message.id,
                    "Message published elsewhere, dropping stale failure"
                );
            }
            Err(e) => {
                error!(message_id = %message.id, error = %e, "Failed to record publish failure");
            }
        }
    }
}
