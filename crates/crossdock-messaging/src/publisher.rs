//! Outbound message publisher contract.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Failure to hand a message to the outbound transport.
///
/// Separate from the domain error taxonomy: publishing is best-effort,
/// and call sites log and drop this error instead of propagating it into
/// a domain result.
#[derive(Debug, Error)]
#[error("publish failed: {0}")]
pub struct PublishError(pub String);

/// Hands routed messages to the outbound transport.
///
/// Implementations are fire-and-forget: no delivery confirmation reaches
/// the domain, and a failure must never abort the flow that produced the
/// message.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publishes `payload` under `routing_key`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the transport rejects the message.
    async fn publish(
        &self,
        routing_key: &'static str,
        payload: serde_json::Value,
    ) -> Result<(), PublishError>;
}

/// Publisher that writes every message to the structured log.
///
/// Default wiring for environments without a broker.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

#[async_trait]
impl MessagePublisher for LogPublisher {
    async fn publish(
        &self,
        routing_key: &'static str,
        payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        info!(routing_key, %payload, "outbound message");
        Ok(())
    }
}
