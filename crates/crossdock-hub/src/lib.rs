//! Crossdock Hub — the hub bounded context.
//!
//! A registry of logistics hubs with commit-scoped domain event dispatch
//! and a directed-complete route graph over the active hub set. Lifecycle
//! mutations commit through the transactional store; the after-commit
//! fan-out extends or retires the route graph and forwards every event to
//! the outbound publisher.

pub mod application;
pub mod domain;
pub mod fanout;
pub mod store;
