//! Crossdock Core — shared domain abstractions.
//!
//! This crate defines the traits and value types the hub bounded context
//! and its infrastructure crates depend on: the clock, the error taxonomy,
//! the domain-event contract, and the collaborator seams fulfilled by
//! external platform services. It contains no infrastructure code.

pub mod clock;
pub mod distance;
pub mod error;
pub mod event;
pub mod identity;
