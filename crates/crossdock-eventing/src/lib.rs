//! Crossdock Eventing — commit-scoped domain event delivery.
//!
//! Domain events raised during a unit of work are staged in an
//! [`channel::EventChannel`] keyed by transaction id. When the store
//! reports a successful commit the staged events are released, in raise
//! order, to an [`dispatcher::EventDispatcher`] that fans each one out to
//! every registered handler on its own task. A rolled-back unit of work
//! releases nothing.

pub mod channel;
pub mod dispatcher;
