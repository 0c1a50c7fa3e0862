//! Route graph maintenance.
//!
//! Keeps the directed-complete route graph over active hubs consistent
//! with hub lifecycle transitions. Each recomputation runs as its own unit
//! of work, separate from and later than the mutation that triggered it:
//! a freshly registered hub is externally visible for a moment before its
//! routes exist.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crossdock_core::clock::Clock;
use crossdock_core::distance::DistanceProvider;
use crossdock_core::error::DomainError;
use crossdock_core::event::DomainEvent;
use crossdock_messaging::MessagePublisher;

use crate::domain::events::RouteUpdated;
use crate::domain::route::HubRoute;
use crate::store::MemoryStore;

/// Sole writer of the route graph.
///
/// Registration measures both directed legs against every active peer and
/// commits them as one batch; any measurement failure abandons the whole
/// batch so a partial peer set is never persisted. Deletion retires every
/// route touching the hub. After a successful commit the engine signals
/// `routeUpdated` to the outbound publisher, best-effort.
pub struct RouteGraphService {
    store: Arc<MemoryStore>,
    distances: Arc<dyn DistanceProvider>,
    publisher: Arc<dyn MessagePublisher>,
    clock: Arc<dyn Clock>,
}

impl RouteGraphService {
    /// Creates the engine over its collaborator seams.
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        distances: Arc<dyn DistanceProvider>,
        publisher: Arc<dyn MessagePublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            distances,
            publisher,
            clock,
        }
    }

    /// Connects a newly registered hub to every other active hub.
    ///
    /// For each of the N active peers, both directed legs are measured
    /// separately (peer to new hub, new hub to peer) and staged as two
    /// independent rows, for 2N rows in one unit of work. Zero peers is a
    /// valid outcome, not an error. Returns the number of route rows
    /// written; rows whose peer was retired between the snapshot and the
    /// commit are skipped by the store and not counted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::HubNotFound` when `new_hub_id` has no stored
    /// row, or `DomainError::RouteComputation` when any leg cannot be
    /// measured, in which case nothing is persisted and no signal is sent.
    pub async fn on_hub_registered(&self, new_hub_id: Uuid) -> Result<usize, DomainError> {
        let new_hub = self
            .store
            .hub(new_hub_id)
            .ok_or(DomainError::HubNotFound(new_hub_id))?;

        let peers: Vec<_> = self
            .store
            .active_hubs()
            .into_iter()
            .filter(|hub| hub.id != new_hub_id)
            .collect();

        let mut tx = self.store.begin();
        for peer in &peers {
            let inbound = self
                .distances
                .route(peer.coordinate, new_hub.coordinate)
                .await?;
            tx.put_route(HubRoute::connect(
                peer.id,
                new_hub.id,
                inbound,
                self.clock.as_ref(),
            ));

            let outbound = self
                .distances
                .route(new_hub.coordinate, peer.coordinate)
                .await?;
            tx.put_route(HubRoute::connect(
                new_hub.id,
                peer.id,
                outbound,
                self.clock.as_ref(),
            ));
        }
        let outcome = tx.commit();

        info!(
            hub_id = %new_hub_id,
            peers = peers.len(),
            routes = outcome.routes_written,
            "route graph extended"
        );
        self.signal_route_update(new_hub_id).await;
        Ok(outcome.routes_written)
    }

    /// Retires every active route touching a deleted hub.
    ///
    /// Each route is soft-deleted with `deactivated_by` as the audit
    /// actor. A hub with no touching routes is a no-op write that still
    /// signals, so consumers can refresh unconditionally. Returns the
    /// number of routes retired.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; the `Result` keeps the contract
    /// open for stores that can fail.
    pub async fn on_hub_deleted(
        &self,
        hub_id: Uuid,
        deactivated_by: &str,
    ) -> Result<usize, DomainError> {
        let mut routes = self.store.active_routes_touching(hub_id);

        let mut tx = self.store.begin();
        for route in &mut routes {
            route.mark_deleted(deactivated_by, self.clock.as_ref());
            tx.put_route(route.clone());
        }
        let outcome = tx.commit();

        info!(
            hub_id = %hub_id,
            routes = outcome.routes_written,
            "routes retired"
        );
        self.signal_route_update(hub_id).await;
        Ok(outcome.routes_written)
    }

    /// Active routes starting at `source_hub_id`.
    #[must_use]
    pub fn routes_from(&self, source_hub_id: Uuid) -> Vec<HubRoute> {
        self.store.active_routes_from(source_hub_id)
    }

    /// Every active route in the graph.
    #[must_use]
    pub fn active_routes(&self) -> Vec<HubRoute> {
        self.store.active_routes()
    }

    async fn signal_route_update(&self, hub_id: Uuid) {
        let signal = RouteUpdated { hub_id };
        if let Err(error) = self
            .publisher
            .publish(signal.routing_key(), signal.to_payload())
            .await
        {
            warn!(hub_id = %hub_id, %error, "route update signal dropped");
        }
    }
}
