//! Asynchronous fan-out of committed events.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crossdock_core::error::DomainError;

/// One interested party on the committed-event stream.
#[async_trait]
pub trait EventHandler<E>: Send + Sync {
    /// Stable name used in delivery logs.
    fn name(&self) -> &'static str;

    /// Reacts to one committed event.
    ///
    /// # Errors
    ///
    /// Failures are warn-logged by the dispatcher and never retried. They
    /// must not leak side effects that block other handlers.
    async fn handle(&self, event: E) -> Result<(), DomainError>;
}

/// Delivers every committed event to every registered handler.
///
/// Each handler invocation runs on its own spawned task, so one handler's
/// failure, slowness, or panic cannot delay or abort delivery to the
/// others, and the committing caller never waits for any of them.
pub struct EventDispatcher<E> {
    handlers: Vec<Arc<dyn EventHandler<E>>>,
}

impl<E> EventDispatcher<E> {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registers a handler for every committed event.
    pub fn register(&mut self, handler: Arc<dyn EventHandler<E>>) {
        self.handlers.push(handler);
    }
}

impl<E> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventDispatcher<E>
where
    E: Clone + Debug + Send + Sync + 'static,
{
    /// Starts the delivery loop on a background task.
    ///
    /// The loop ends once every sender side of `receiver` has been
    /// dropped and the queue is drained; the returned handle resolves at
    /// that point.
    pub fn spawn(self, mut receiver: mpsc::UnboundedReceiver<E>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                for handler in &self.handlers {
                    let handler = handler.clone();
                    let event = event.clone();
                    tokio::spawn(async move {
                        debug!(handler = handler.name(), event = ?event, "delivering event");
                        if let Err(error) = handler.handle(event).await {
                            warn!(handler = handler.name(), %error, "event handler failed");
                        }
                    });
                }
            }
            debug!("event dispatcher stopped");
        })
    }
}
