//! In-process broadcast of outbound messages.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::publisher::{MessagePublisher, PublishError};

/// Default broadcast channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// One routed message as seen by in-process subscribers.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Routing discriminator.
    pub routing_key: &'static str,
    /// JSON payload.
    pub payload: serde_json::Value,
}

/// Publisher that fans messages out to in-process subscribers.
///
/// Stands in for the broker in single-node deployments: consumers
/// subscribe and receive every message published after they subscribed.
/// Distributed deployments put a broker client behind the same trait
/// instead.
pub struct BroadcastPublisher {
    sender: broadcast::Sender<OutboundMessage>,
}

impl BroadcastPublisher {
    /// Creates a publisher with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a publisher with the given channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to every message published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OutboundMessage> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePublisher for BroadcastPublisher {
    async fn publish(
        &self,
        routing_key: &'static str,
        payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        match self.sender.send(OutboundMessage {
            routing_key,
            payload,
        }) {
            Ok(subscribers) => {
                debug!(routing_key, subscribers, "message broadcast");
            }
            // Zero subscribers is a valid state, not a delivery failure.
            Err(_) => {
                debug!(routing_key, "no subscribers; message dropped");
            }
        }
        Ok(())
    }
}
