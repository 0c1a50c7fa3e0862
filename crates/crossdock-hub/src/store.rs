//! Transactional in-memory store for hubs and routes.
//!
//! Shaped like a database pool plus transaction guard: [`MemoryStore::begin`]
//! opens a unit of work, writes and raised events are staged on the guard,
//! and [`StoreTransaction::commit`] applies everything atomically before
//! releasing the staged events toward the dispatcher. A guard dropped
//! without committing rolls the unit of work back: nothing becomes visible
//! and nothing is delivered.
//!
//! Reads observe committed state only; no flow in this context needs to
//! read its own staged writes.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crossdock_eventing::channel::{EventChannel, TxId};

use crate::domain::events::HubEvent;
use crate::domain::hub::Hub;
use crate::domain::route::HubRoute;

/// Keyword search over the hub table.
#[derive(Debug, Clone, Default)]
pub struct HubSearch {
    /// Case-insensitive fragment matched against name, street, and detail.
    pub keyword: Option<String>,
    /// Include soft-deleted hubs in the result.
    pub include_deleted: bool,
}

/// Counts of rows applied by one committed unit of work.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitOutcome {
    /// Hub rows written.
    pub hubs_written: usize,
    /// Route rows written.
    pub routes_written: usize,
    /// Staged routes dropped because an endpoint hub was no longer active
    /// at commit time.
    pub routes_skipped: usize,
}

#[derive(Debug, Default)]
struct Tables {
    hubs: HashMap<Uuid, Hub>,
    routes: HashMap<Uuid, HubRoute>,
    /// Secondary index: route ids touching a hub, covering both endpoints.
    routes_by_hub: HashMap<Uuid, HashSet<Uuid>>,
}

impl Tables {
    fn hub_is_active(&self, hub_id: Uuid) -> bool {
        self.hubs.get(&hub_id).is_some_and(Hub::is_active)
    }
}

/// Shared handle over the committed hub and route tables.
///
/// Construction also yields the receiving end of the committed-event
/// stream; hand it to an `EventDispatcher` (or hold it directly in tests).
pub struct MemoryStore {
    tables: RwLock<Tables>,
    channel: EventChannel<HubEvent>,
    next_tx: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store and the committed-event receiver fed by it.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HubEvent>) {
        let (channel, receiver) = EventChannel::new();
        let store = Self {
            tables: RwLock::new(Tables::default()),
            channel,
            next_tx: AtomicU64::new(1),
        };
        (store, receiver)
    }

    /// Opens a unit of work.
    #[must_use]
    pub fn begin(&self) -> StoreTransaction<'_> {
        let tx = TxId::new(self.next_tx.fetch_add(1, Ordering::Relaxed));
        StoreTransaction {
            store: self,
            tx,
            hubs: Vec::new(),
            routes: Vec::new(),
            committed: false,
        }
    }

    /// The hub row for `hub_id`, soft-deleted rows included.
    #[must_use]
    pub fn hub(&self, hub_id: Uuid) -> Option<Hub> {
        self.read_tables().hubs.get(&hub_id).cloned()
    }

    /// Every active hub, ordered by registration time.
    #[must_use]
    pub fn active_hubs(&self) -> Vec<Hub> {
        let tables = self.read_tables();
        let mut hubs: Vec<Hub> = tables
            .hubs
            .values()
            .filter(|hub| hub.is_active())
            .cloned()
            .collect();
        hubs.sort_by_key(|hub| (hub.created_at, hub.id));
        hubs
    }

    /// Hubs matching `search`, ordered by registration time.
    #[must_use]
    pub fn search_hubs(&self, search: &HubSearch) -> Vec<Hub> {
        let keyword = search.keyword.as_ref().map(|kw| kw.to_lowercase());
        let tables = self.read_tables();
        let mut hubs: Vec<Hub> = tables
            .hubs
            .values()
            .filter(|hub| search.include_deleted || hub.is_active())
            .filter(|hub| {
                keyword.as_ref().is_none_or(|kw| {
                    hub.name.to_lowercase().contains(kw)
                        || hub.address.street.to_lowercase().contains(kw)
                        || hub
                            .address
                            .detail
                            .as_ref()
                            .is_some_and(|detail| detail.to_lowercase().contains(kw))
                })
            })
            .cloned()
            .collect();
        hubs.sort_by_key(|hub| (hub.created_at, hub.id));
        hubs
    }

    /// Physical hub row count, soft-deleted rows included.
    #[must_use]
    pub fn hub_count(&self) -> usize {
        self.read_tables().hubs.len()
    }

    /// The route row for `route_id`, soft-deleted rows included.
    #[must_use]
    pub fn route(&self, route_id: Uuid) -> Option<HubRoute> {
        self.read_tables().routes.get(&route_id).cloned()
    }

    /// Every active route, ordered by creation time.
    #[must_use]
    pub fn active_routes(&self) -> Vec<HubRoute> {
        let tables = self.read_tables();
        let mut routes: Vec<HubRoute> = tables
            .routes
            .values()
            .filter(|route| route.is_active())
            .cloned()
            .collect();
        routes.sort_by_key(|route| (route.created_at, route.id));
        routes
    }

    /// Active routes whose source is `source_hub_id`.
    #[must_use]
    pub fn active_routes_from(&self, source_hub_id: Uuid) -> Vec<HubRoute> {
        self.active_routes_touching(source_hub_id)
            .into_iter()
            .filter(|route| route.source_hub_id == source_hub_id)
            .collect()
    }

    /// Active routes starting or ending at `hub_id`, via the secondary
    /// index.
    #[must_use]
    pub fn active_routes_touching(&self, hub_id: Uuid) -> Vec<HubRoute> {
        let tables = self.read_tables();
        let Some(route_ids) = tables.routes_by_hub.get(&hub_id) else {
            return Vec::new();
        };
        let mut routes: Vec<HubRoute> = route_ids
            .iter()
            .filter_map(|route_id| tables.routes.get(route_id))
            .filter(|route| route.is_active())
            .cloned()
            .collect();
        routes.sort_by_key(|route| (route.created_at, route.id));
        routes
    }

    /// Physical route row count, soft-deleted rows included.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.read_tables().routes.len()
    }

    fn read_tables(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().expect("store lock poisoned")
    }
}

/// One unit of work: staged writes plus staged domain events.
///
/// Writes become visible and events are released only at [`Self::commit`].
/// Dropping the guard without committing discards both.
pub struct StoreTransaction<'a> {
    store: &'a MemoryStore,
    tx: TxId,
    hubs: Vec<Hub>,
    routes: Vec<HubRoute>,
    committed: bool,
}

impl StoreTransaction<'_> {
    /// Stages a hub row (insert or replace by id).
    pub fn put_hub(&mut self, hub: Hub) {
        self.hubs.push(hub);
    }

    /// Stages a route row (insert or replace by id).
    pub fn put_route(&mut self, route: HubRoute) {
        self.routes.push(route);
    }

    /// Raises a domain event scoped to this unit of work. The event
    /// reaches subscribers only if the unit of work commits.
    pub fn raise(&self, event: HubEvent) {
        self.store.channel.raise(self.tx, event);
    }

    /// Applies every staged write atomically, then releases the staged
    /// events toward the dispatcher.
    ///
    /// Staged **active** routes are re-validated under the table lock: a
    /// row whose source or target hub is missing or retired by the time
    /// the batch lands is skipped with a warning, so a hub deletion racing
    /// the measurement phase cannot leave a live route into a dead hub.
    /// Retirements (staged soft-deleted routes) always apply.
    pub fn commit(mut self) -> CommitOutcome {
        self.committed = true;
        let staged_hubs = std::mem::take(&mut self.hubs);
        let staged_routes = std::mem::take(&mut self.routes);
        let mut outcome = CommitOutcome::default();
        {
            let mut tables = self.store.tables.write().expect("store lock poisoned");
            for hub in staged_hubs {
                tables.hubs.insert(hub.id, hub);
                outcome.hubs_written += 1;
            }
            for route in staged_routes {
                let endpoints_active = tables.hub_is_active(route.source_hub_id)
                    && tables.hub_is_active(route.target_hub_id);
                if route.is_active() && !endpoints_active {
                    warn!(
                        route_id = %route.id,
                        source = %route.source_hub_id,
                        target = %route.target_hub_id,
                        "staged route skipped; endpoint hub no longer active"
                    );
                    outcome.routes_skipped += 1;
                    continue;
                }
                tables
                    .routes_by_hub
                    .entry(route.source_hub_id)
                    .or_default()
                    .insert(route.id);
                tables
                    .routes_by_hub
                    .entry(route.target_hub_id)
                    .or_default()
                    .insert(route.id);
                tables.routes.insert(route.id, route);
                outcome.routes_written += 1;
            }
        }
        debug!(
            tx = %self.tx,
            hubs = outcome.hubs_written,
            routes = outcome.routes_written,
            skipped = outcome.routes_skipped,
            "unit of work applied"
        );
        self.store.channel.commit(self.tx);
        outcome
    }
}

impl Drop for StoreTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.store.channel.rollback(self.tx);
            if !self.hubs.is_empty() || !self.routes.is_empty() {
                debug!(tx = %self.tx, "uncommitted writes discarded");
            }
        }
    }
}
