//! Crossdock Messaging — the outbound publisher boundary.
//!
//! Domain events leave the process as a routing discriminator plus a JSON
//! payload. This crate defines that contract and ships two in-process
//! implementations: a structured-log sink and a broadcast-channel fan-out
//! for single-node deployments. The broker transport itself lives behind
//! the same trait, outside this workspace.

pub mod broadcast;
pub mod publisher;

pub use broadcast::{BroadcastPublisher, OutboundMessage};
pub use publisher::{LogPublisher, MessagePublisher, PublishError};
