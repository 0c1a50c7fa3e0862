//! Shared wiring for hub pipeline integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crossdock_core::clock::Clock;
use crossdock_core::distance::{DistanceProvider, RouteLeg};
use crossdock_core::identity::Requester;
use crossdock_eventing::dispatcher::EventDispatcher;
use crossdock_hub::application::lifecycle::{HubLifecycleService, HubRegistration};
use crossdock_hub::application::queries::HubQueryService;
use crossdock_hub::application::route_graph::RouteGraphService;
use crossdock_hub::fanout::{PublishFanoutHandler, RouteFanoutHandler};
use crossdock_hub::store::MemoryStore;
use crossdock_test_support::{
    FixedClock, FixedDistanceProvider, RecordingPublisher, StaticManagerDirectory,
    StaticMemberDirectory, StaticPermissionChecker, init_test_tracing,
};

/// The fully wired pipeline: transactional store, commit-scoped channel,
/// dispatcher with both fan-out handlers, and scripted collaborators.
///
/// Built the same way a composition root would build it, with the
/// recording publisher standing in for the broker.
pub struct TestNetwork {
    pub store: Arc<MemoryStore>,
    pub lifecycle: HubLifecycleService,
    pub queries: HubQueryService,
    pub routes: Arc<RouteGraphService>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestNetwork {
    /// A network that grants everyone manage rights and activates exactly
    /// the given members.
    pub fn start(members: impl IntoIterator<Item = Uuid>) -> Self {
        Self::build(
            StaticPermissionChecker::allow_all(),
            StaticMemberDirectory::with_members(members),
            Arc::new(FixedDistanceProvider::new(standard_leg())),
        )
    }

    /// A network over explicitly scripted collaborators. Tests that
    /// inspect measurements keep their own handle on the provider and
    /// pass a clone in.
    pub fn build(
        permissions: StaticPermissionChecker,
        members: StaticMemberDirectory,
        distances: Arc<dyn DistanceProvider>,
    ) -> Self {
        init_test_tracing();
        let clock: Arc<dyn Clock> =
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()));
        let (store, events) = MemoryStore::new();
        let store = Arc::new(store);
        let publisher = Arc::new(RecordingPublisher::new());

        let routes = Arc::new(RouteGraphService::new(
            store.clone(),
            distances,
            publisher.clone(),
            clock.clone(),
        ));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Arc::new(RouteFanoutHandler::new(routes.clone())));
        dispatcher.register(Arc::new(PublishFanoutHandler::new(publisher.clone())));
        dispatcher.spawn(events);

        let lifecycle = HubLifecycleService::new(
            store.clone(),
            Arc::new(permissions),
            Arc::new(members),
            clock.clone(),
        );
        let queries = HubQueryService::new(
            store.clone(),
            Arc::new(StaticManagerDirectory::default()),
        );

        Self {
            store,
            lifecycle,
            queries,
            routes,
            publisher,
        }
    }

    /// Messages published so far under `routing_key`.
    pub fn published(&self, routing_key: &str) -> Vec<serde_json::Value> {
        self.publisher
            .messages()
            .into_iter()
            .filter(|(key, _)| *key == routing_key)
            .map(|(_, payload)| payload)
            .collect()
    }

    /// Number of messages published so far under `routing_key`.
    pub fn published_count(&self, routing_key: &str) -> usize {
        self.published(routing_key).len()
    }
}

/// The leg every scripted measurement answers with.
pub fn standard_leg() -> RouteLeg {
    RouteLeg {
        distance_km: 217.4,
        duration_minutes: 154,
    }
}

/// A requester with a fresh member id.
pub fn requester(username: &str) -> Requester {
    Requester::new(Uuid::new_v4(), username)
}

/// Registration data for a hub at the given position.
pub fn registration(
    name: &str,
    manager_id: Uuid,
    latitude: f64,
    longitude: f64,
) -> HubRegistration {
    HubRegistration {
        name: name.to_owned(),
        street: format!("{name} street"),
        detail: None,
        latitude,
        longitude,
        manager_id,
    }
}
