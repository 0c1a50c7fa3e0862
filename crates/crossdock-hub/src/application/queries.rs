//! Read-only queries over the hub registry.

use std::sync::Arc;

use uuid::Uuid;

use crossdock_core::error::DomainError;
use crossdock_core::identity::{ManagerInfoFinder, ManagerProfile};

use crate::domain::hub::Hub;
use crate::store::{HubSearch, MemoryStore};

/// Read side of the hub registry.
///
/// Lookups by id resolve soft-deleted hubs too; only the active-set views
/// filter them out.
pub struct HubQueryService {
    store: Arc<MemoryStore>,
    managers: Arc<dyn ManagerInfoFinder>,
}

impl HubQueryService {
    /// Creates the service over the store and the manager directory.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>, managers: Arc<dyn ManagerInfoFinder>) -> Self {
        Self { store, managers }
    }

    /// The hub with the given id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::HubNotFound` when no row exists for `hub_id`.
    pub fn find(&self, hub_id: Uuid) -> Result<Hub, DomainError> {
        self.store
            .hub(hub_id)
            .ok_or(DomainError::HubNotFound(hub_id))
    }

    /// Every active hub.
    #[must_use]
    pub fn find_all_active(&self) -> Vec<Hub> {
        self.store.active_hubs()
    }

    /// Hubs matching the keyword and deleted-state filter.
    #[must_use]
    pub fn search(&self, search: &HubSearch) -> Vec<Hub> {
        self.store.search_hubs(search)
    }

    /// The profile of a hub's manager, resolved through the membership
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::HubNotFound` when the hub does not exist, or
    /// `DomainError::MemberNotFound` when its manager no longer resolves.
    pub async fn find_manager(&self, hub_id: Uuid) -> Result<ManagerProfile, DomainError> {
        let hub = self.find(hub_id)?;
        self.managers.find(hub.manager_id).await
    }
}
