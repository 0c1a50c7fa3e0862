//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Outbound publish failures are not represented here: the publisher
/// boundary carries its own error type, which call sites log and drop, so
/// a failed publish never surfaces as a domain failure.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requester lacks hub-manage permission.
    #[error("member {0} lacks hub manage permission")]
    PermissionDenied(Uuid),

    /// A referenced member id does not resolve to an existing, activated
    /// member.
    #[error("member not found or not activated: {0}")]
    MemberNotFound(Uuid),

    /// An operation or query targeted a hub id with no stored row.
    #[error("hub not found: {0}")]
    HubNotFound(Uuid),

    /// A route batch could not be measured; the whole batch is abandoned.
    #[error("route computation failed: {0}")]
    RouteComputation(String),

    /// A store or collaborator transport failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
