//! Identity and membership collaborator contracts.
//!
//! These seams are fulfilled by the platform's identity service; the core
//! defines only the behavior it relies on. All checks are performed by
//! the application services before any state is staged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// The acting identity behind a lifecycle request.
#[derive(Debug, Clone)]
pub struct Requester {
    /// Member id used for permission checks.
    pub id: Uuid,
    /// Username recorded as the event actor.
    pub username: String,
}

impl Requester {
    /// Creates a requester identity.
    #[must_use]
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Checks whether a member may manage hubs.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    /// Returns `true` when the member holds hub-manage rights.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` when the identity service
    /// cannot answer.
    async fn has_manage_permission(&self, member_id: Uuid) -> Result<bool, DomainError>;
}

/// Checks whether a member id resolves to a usable member.
#[async_trait]
pub trait MemberExistenceChecker: Send + Sync {
    /// Returns `true` only for an existing member whose status is
    /// activated; pending or rejected members do not count.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` when the membership directory
    /// cannot answer.
    async fn has_member(&self, member_id: Uuid) -> Result<bool, DomainError>;
}

/// Profile of a hub manager, as exposed to read-side consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerProfile {
    /// Member id of the manager.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login username.
    pub username: String,
    /// Handle on the team chat system.
    pub chat_handle: String,
}

/// Resolves manager profiles from the membership directory.
#[async_trait]
pub trait ManagerInfoFinder: Send + Sync {
    /// Looks up the profile for `manager_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MemberNotFound` when the id does not resolve,
    /// or `DomainError::Infrastructure` when the directory cannot answer.
    async fn find(&self, manager_id: Uuid) -> Result<ManagerProfile, DomainError>;
}
