//! Domain event contract.

use std::fmt::Debug;

/// A domain event value raised by a successful mutation.
///
/// Events are immutable snapshots constructed from post-mutation aggregate
/// state. They cross the process boundary as a routing discriminator plus a
/// JSON payload; consumers bind on the discriminator.
pub trait DomainEvent: Send + Sync + Debug {
    /// The routing discriminator consumers bind on, e.g. `"registered"`.
    fn routing_key(&self) -> &'static str;

    /// JSON snapshot of the event value, using wire (camelCase) field
    /// names.
    fn to_payload(&self) -> serde_json::Value;
}
