//! Application services for the hub bounded context.
//!
//! Each service orchestrates one side of the context: lifecycle mutations
//! commit through the transactional store and raise exactly one domain
//! event, the route graph engine runs in its own later units of work, and
//! the query service is read-only.

pub mod lifecycle;
pub mod queries;
pub mod route_graph;
