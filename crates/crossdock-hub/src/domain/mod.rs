//! Domain model for the hub bounded context.

pub mod events;
pub mod hub;
pub mod route;
