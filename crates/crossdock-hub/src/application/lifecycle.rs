//! Hub lifecycle mutations.
//!
//! Every operation validates its preconditions through the injected
//! collaborators, applies the mutation, and commits the aggregate together
//! with exactly one raised domain event in a single unit of work. A failed
//! precondition returns before any state is staged, so nothing is written
//! and nothing is ever delivered for that request.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crossdock_core::clock::Clock;
use crossdock_core::distance::Coordinate;
use crossdock_core::error::DomainError;
use crossdock_core::identity::{MemberExistenceChecker, PermissionChecker, Requester};

use crate::domain::events::{
    HubDeleted, HubEvent, HubManagerChanged, HubRegistered, HubUpdated,
};
use crate::domain::hub::{Address, Hub};
use crate::store::MemoryStore;

/// Request data for registering a hub.
#[derive(Debug, Clone)]
pub struct HubRegistration {
    /// Display name.
    pub name: String,
    /// Street line of the address.
    pub street: String,
    /// Optional detail line of the address.
    pub detail: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Member id of the designated manager.
    pub manager_id: Uuid,
}

/// Request data for replacing a hub's descriptive fields.
#[derive(Debug, Clone)]
pub struct HubUpdate {
    /// New display name.
    pub name: String,
    /// New street line.
    pub street: String,
    /// New optional detail line.
    pub detail: Option<String>,
    /// New latitude in decimal degrees.
    pub latitude: f64,
    /// New longitude in decimal degrees.
    pub longitude: f64,
}

/// Write-side service for the Hub aggregate.
///
/// Precondition checks run in a fixed order: the permission check always
/// comes first, so a permission failure masks any member-existence failure
/// behind it.
pub struct HubLifecycleService {
    store: Arc<MemoryStore>,
    permissions: Arc<dyn PermissionChecker>,
    members: Arc<dyn MemberExistenceChecker>,
    clock: Arc<dyn Clock>,
}

impl HubLifecycleService {
    /// Creates the service over its collaborator seams.
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        permissions: Arc<dyn PermissionChecker>,
        members: Arc<dyn MemberExistenceChecker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            permissions,
            members,
            clock,
        }
    }

    /// Registers a new hub and raises [`HubEvent::Registered`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PermissionDenied` when the requester lacks
    /// manage rights, or `DomainError::MemberNotFound` when the designated
    /// manager does not resolve to an activated member.
    pub async fn register(
        &self,
        registration: HubRegistration,
        requester: &Requester,
    ) -> Result<Hub, DomainError> {
        self.ensure_can_manage(requester).await?;
        self.ensure_member_exists(registration.manager_id).await?;

        let hub = Hub::register(
            registration.name,
            Address::new(registration.street, registration.detail),
            Coordinate::new(registration.latitude, registration.longitude),
            registration.manager_id,
            self.clock.as_ref(),
        );

        let mut tx = self.store.begin();
        tx.put_hub(hub.clone());
        tx.raise(HubEvent::Registered(HubRegistered::from_hub(
            &hub,
            &requester.username,
        )));
        tx.commit();

        info!(hub_id = %hub.id, name = %hub.name, "hub registered");
        Ok(hub)
    }

    /// Replaces a hub's name, address, and coordinate and raises
    /// [`HubEvent::Updated`]. The manager is untouched, and existing routes
    /// are not re-measured.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PermissionDenied` when the requester lacks
    /// manage rights, or `DomainError::HubNotFound` when `hub_id` has no
    /// stored row.
    pub async fn update_info(
        &self,
        hub_id: Uuid,
        update: HubUpdate,
        requester: &Requester,
    ) -> Result<Hub, DomainError> {
        self.ensure_can_manage(requester).await?;
        let mut hub = self.load(hub_id)?;

        hub.update_info(
            update.name,
            Address::new(update.street, update.detail),
            Coordinate::new(update.latitude, update.longitude),
            self.clock.as_ref(),
        );

        let mut tx = self.store.begin();
        tx.put_hub(hub.clone());
        tx.raise(HubEvent::Updated(HubUpdated::from_hub(
            &hub,
            &requester.username,
        )));
        tx.commit();

        info!(hub_id = %hub.id, "hub info updated");
        Ok(hub)
    }

    /// Soft-deletes a hub, recording `deleted_by` as the audit actor, and
    /// raises [`HubEvent::Deleted`].
    ///
    /// Deleting an already-deleted hub is a no-op: the first deletion's
    /// actor and timestamp are preserved and no second event is raised.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PermissionDenied` when the requester lacks
    /// manage rights, or `DomainError::HubNotFound` when `hub_id` has no
    /// stored row.
    pub async fn delete(
        &self,
        hub_id: Uuid,
        deleted_by: &str,
        requester: &Requester,
    ) -> Result<Hub, DomainError> {
        self.ensure_can_manage(requester).await?;
        let mut hub = self.load(hub_id)?;

        if !hub.mark_deleted(deleted_by, self.clock.as_ref()) {
            info!(hub_id = %hub.id, "hub already deleted; nothing to do");
            return Ok(hub);
        }

        let mut tx = self.store.begin();
        tx.put_hub(hub.clone());
        tx.raise(HubEvent::Deleted(HubDeleted::from_hub(
            &hub,
            &requester.username,
        )));
        tx.commit();

        info!(hub_id = %hub.id, deleted_by, "hub deleted");
        Ok(hub)
    }

    /// Hands a hub to a new manager and raises
    /// [`HubEvent::ManagerChanged`] carrying both the old and the new
    /// manager id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PermissionDenied` when the requester lacks
    /// manage rights, `DomainError::MemberNotFound` when the new manager
    /// does not resolve to an activated member, or
    /// `DomainError::HubNotFound` when `hub_id` has no stored row.
    pub async fn change_manager(
        &self,
        hub_id: Uuid,
        new_manager_id: Uuid,
        requester: &Requester,
    ) -> Result<Hub, DomainError> {
        self.ensure_can_manage(requester).await?;
        self.ensure_member_exists(new_manager_id).await?;
        let mut hub = self.load(hub_id)?;

        let old_manager_id = hub.change_manager(new_manager_id, self.clock.as_ref());

        let mut tx = self.store.begin();
        tx.put_hub(hub.clone());
        tx.raise(HubEvent::ManagerChanged(HubManagerChanged::from_hub(
            &hub,
            old_manager_id,
            &requester.username,
        )));
        tx.commit();

        info!(
            hub_id = %hub.id,
            old_manager = %old_manager_id,
            new_manager = %new_manager_id,
            "hub manager changed"
        );
        Ok(hub)
    }

    async fn ensure_can_manage(&self, requester: &Requester) -> Result<(), DomainError> {
        if self.permissions.has_manage_permission(requester.id).await? {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied(requester.id))
        }
    }

    async fn ensure_member_exists(&self, member_id: Uuid) -> Result<(), DomainError> {
        if self.members.has_member(member_id).await? {
            Ok(())
        } else {
            Err(DomainError::MemberNotFound(member_id))
        }
    }

    fn load(&self, hub_id: Uuid) -> Result<Hub, DomainError> {
        self.store
            .hub(hub_id)
            .ok_or(DomainError::HubNotFound(hub_id))
    }
}
