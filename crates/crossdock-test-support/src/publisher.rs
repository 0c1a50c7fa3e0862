//! Publisher doubles — recording and failing `MessagePublisher`
//! implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use crossdock_messaging::{MessagePublisher, PublishError};

/// A publisher that records every message it is handed.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl RecordingPublisher {
    /// Creates an empty recording publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every (routing key, payload) pair published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn messages(&self) -> Vec<(&'static str, serde_json::Value)> {
        self.messages.lock().unwrap().clone()
    }

    /// Routing keys published so far, in publish order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn routing_keys(&self) -> Vec<&'static str> {
        self.messages.lock().unwrap().iter().map(|(key, _)| *key).collect()
    }

    /// Number of messages published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl MessagePublisher for RecordingPublisher {
    async fn publish(
        &self,
        routing_key: &'static str,
        payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        self.messages.lock().unwrap().push((routing_key, payload));
        Ok(())
    }
}

/// A publisher that rejects every message.
#[derive(Debug)]
pub struct FailingPublisher;

#[async_trait]
impl MessagePublisher for FailingPublisher {
    async fn publish(
        &self,
        _routing_key: &'static str,
        _payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        Err(PublishError("broker unavailable".to_owned()))
    }
}
