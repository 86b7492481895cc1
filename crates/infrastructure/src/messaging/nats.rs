//! NATS JetStream transport.
//!
//! One subject per event type under `staffhub.events.*`; a single stream
//! captures the whole hierarchy. Publishing waits for the JetStream ack so
//! the relay only marks a message PUBLISHED once the broker has stored it.

use async_nats::jetstream::consumer::pull::Config as PullConsumerConfig;
use async_nats::jetstream::consumer::{AckPolicy, DeliverPolicy, PullConsumer};
use async_nats::jetstream::stream::Config as StreamConfig;
use async_nats::jetstream::Context as JetStreamContext;
use async_nats::{Client, ConnectOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use staffhub_domain::event_bus::{EventBus, EventBusError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const STREAM_NAME: &str = "STAFFHUB_EVENTS";
const SUBJECT_ROOT: &str = "staffhub.events";

/// Subject an event type is published under.
pub fn subject_for(event_type: &str) -> String {
    format!("{}.{}", SUBJECT_ROOT, event_type)
}

/// NATS connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatsConfig {
    /// NATS server URLs
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connection_timeout_secs: u64,
    /// Max reconnection attempts (None = infinite)
    #[serde(default = "default_max_reconnects")]
    pub max_reconnects: Option<usize>,
    /// Client connection name
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            urls: default_urls(),
            connection_timeout_secs: default_connect_timeout(),
            max_reconnects: default_max_reconnects(),
            name: None,
        }
    }
}

fn default_urls() -> Vec<String> {
    vec!["nats://localhost:4222".to_string()]
}

const fn default_connect_timeout() -> u64 {
    5
}

fn default_max_reconnects() -> Option<usize> {
    Some(5)
}

impl NatsConfig {
    pub fn primary_url(&self) -> &str {
        self.urls
            .first()
            .map(|s| s.as_str())
            .unwrap_or("nats://localhost:4222")
    }
}

/// JetStream-backed implementation of the domain `EventBus`.
#[derive(Clone)]
pub struct NatsEventBus {
    client: Arc<Client>,
    jetstream: JetStreamContext,
}

impl NatsEventBus {
    /// Connect to NATS and make sure the event stream exists.
    ///
    /// # Errors
    /// Returns an error if the connection or stream creation fails.
    pub async fn connect(config: &NatsConfig) -> Result<Self, EventBusError> {
        let mut connect_options = ConnectOptions::default()
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs));

        if let Some(max_reconnects) = config.max_reconnects {
            connect_options = connect_options.max_reconnects(max_reconnects);
        }
        if let Some(name) = &config.name {
            connect_options = connect_options.name(name);
        }

        let client = async_nats::connect_with_options(config.primary_url(), connect_options)
            .await
            .map_err(|e| EventBusError::ConnectionError(e.to_string()))?;

        let jetstream = async_nats::jetstream::new(client.clone());

        let bus = Self {
            client: Arc::new(client),
            jetstream,
        };
        bus.ensure_stream().await?;
        Ok(bus)
    }

    async fn ensure_stream(&self) -> Result<(), EventBusError> {
        if self.jetstream.get_stream(STREAM_NAME).await.is_ok() {
            debug!(stream = STREAM_NAME, "Stream already exists");
            return Ok(());
        }

        info!(stream = STREAM_NAME, "Creating event stream");
        let stream_config = StreamConfig {
            name: STREAM_NAME.to_string(),
            subjects: vec![format!("{}.>", SUBJECT_ROOT)],
            max_age: Duration::from_secs(7 * 24 * 60 * 60),
            storage: async_nats::jetstream::stream::StorageType::File,
            num_replicas: 1,
            discard: async_nats::jetstream::stream::DiscardPolicy::Old,
            ..Default::default()
        };

        self.jetstream
            .create_stream(stream_config)
            .await
            .map_err(|e| EventBusError::ConnectionError(e.to_string()))?;

        Ok(())
    }

    /// Get or create the durable pull consumer for a consumer group.
    ///
    /// Durable consumers keep their cursor across restarts, so every event
    /// is delivered to the group at least once.
    pub async fn consumer(&self, group: &str) -> Result<PullConsumer, EventBusError> {
        let stream = self
            .jetstream
            .get_stream(STREAM_NAME)
            .await
            .map_err(|e| EventBusError::ConnectionError(e.to_string()))?;

        match stream.get_consumer(group).await {
            Ok(consumer) => {
                debug!(consumer = group, "Consumer already exists");
                return Ok(consumer);
            }
            Err(_) => {
                info!(consumer = group, stream = STREAM_NAME, "Creating consumer");
            }
        }

        let consumer_config = PullConsumerConfig {
            durable_name: Some(group.to_string()),
            deliver_policy: DeliverPolicy::All,
            ack_policy: AckPolicy::Explicit,
            ack_wait: Duration::from_secs(30),
            max_ack_pending: 1000,
            ..Default::default()
        };

        stream
            .create_consumer(consumer_config)
            .await
            .map_err(|e| EventBusError::SubscribeError(e.to_string()))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl EventBus for NatsEventBus {
    async fn publish(&self, routing_key: &str, payload: &[u8]) -> Result<(), EventBusError> {
        let ack = self
            .jetstream
            .publish(routing_key.to_string(), payload.to_vec().into())
            .await
            .map_err(|e| EventBusError::PublishError(e.to_string()))?;

        // The ack confirms the broker stored the message.
        ack.await
            .map_err(|e| EventBusError::PublishError(e.to_string()))?;

        debug!(subject = routing_key, "Published event");
        Ok(())
    }
}
