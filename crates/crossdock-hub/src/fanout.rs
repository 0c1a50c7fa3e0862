//! After-commit fan-out bindings.
//!
//! Two handlers are registered on the dispatcher, so the route-graph
//! reaction and the outbound forwarding of one event run as independent
//! tasks: a failure in either one never suppresses the other.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crossdock_core::error::DomainError;
use crossdock_core::event::DomainEvent;
use crossdock_eventing::dispatcher::EventHandler;
use crossdock_messaging::MessagePublisher;

use crate::application::route_graph::RouteGraphService;
use crate::domain::events::HubEvent;

/// Keeps the route graph in step with hub lifecycle events.
///
/// Registration extends the graph, deletion retires the touching routes;
/// the other events carry no route consequence. Errors surface to the
/// dispatcher, which logs them; the graph then stays stale until a later
/// recomputation.
pub struct RouteFanoutHandler {
    routes: Arc<RouteGraphService>,
}

impl RouteFanoutHandler {
    /// Creates the binding over the route graph engine.
    #[must_use]
    pub fn new(routes: Arc<RouteGraphService>) -> Self {
        Self { routes }
    }
}

#[async_trait]
impl EventHandler<HubEvent> for RouteFanoutHandler {
    fn name(&self) -> &'static str {
        "route-graph"
    }

    async fn handle(&self, event: HubEvent) -> Result<(), DomainError> {
        match event {
            HubEvent::Registered(registered) => {
                self.routes.on_hub_registered(registered.hub_id).await?;
            }
            HubEvent::Deleted(deleted) => {
                self.routes
                    .on_hub_deleted(deleted.hub_id, &deleted.actor)
                    .await?;
            }
            HubEvent::Updated(_) | HubEvent::ManagerChanged(_) => {}
        }
        Ok(())
    }
}

/// Forwards every committed hub event to the outbound publisher.
///
/// Publishing is best-effort: a transport failure is logged and dropped
/// here, never reported to the dispatcher as a handler failure.
pub struct PublishFanoutHandler {
    publisher: Arc<dyn MessagePublisher>,
}

impl PublishFanoutHandler {
    /// Creates the binding over the outbound publisher.
    #[must_use]
    pub fn new(publisher: Arc<dyn MessagePublisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl EventHandler<HubEvent> for PublishFanoutHandler {
    fn name(&self) -> &'static str {
        "outbound-publisher"
    }

    async fn handle(&self, event: HubEvent) -> Result<(), DomainError> {
        let routing_key = event.routing_key();
        if let Err(error) = self.publisher.publish(routing_key, event.to_payload()).await {
            warn!(routing_key, %error, "outbound forward dropped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use crossdock_core::distance::{Coordinate, RouteLeg};
    use crossdock_test_support::{
        FailingPublisher, FixedClock, FixedDistanceProvider, RecordingPublisher,
    };
    use uuid::Uuid;

    use super::*;
    use crate::domain::events::{HubDeleted, HubManagerChanged, HubRegistered, HubUpdated};
    use crate::domain::hub::{Address, Hub};
    use crate::store::MemoryStore;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    fn leg() -> RouteLeg {
        RouteLeg {
            distance_km: 42.0,
            duration_minutes: 38,
        }
    }

    fn seed_hub(store: &MemoryStore, name: &str, latitude: f64) -> Hub {
        let hub = Hub::register(
            name.to_owned(),
            Address::new(format!("{name} street"), None),
            Coordinate::new(latitude, 4.47),
            Uuid::new_v4(),
            &clock(),
        );
        let mut tx = store.begin();
        tx.put_hub(hub.clone());
        tx.commit();
        hub
    }

    struct RouteHarness {
        store: Arc<MemoryStore>,
        distances: Arc<FixedDistanceProvider>,
        handler: RouteFanoutHandler,
    }

    fn route_harness() -> RouteHarness {
        let (store, _events) = MemoryStore::new();
        let store = Arc::new(store);
        let distances = Arc::new(FixedDistanceProvider::new(leg()));
        let routes = Arc::new(RouteGraphService::new(
            store.clone(),
            distances.clone(),
            Arc::new(RecordingPublisher::new()),
            Arc::new(clock()),
        ));
        RouteHarness {
            store,
            distances,
            handler: RouteFanoutHandler::new(routes),
        }
    }

    #[tokio::test]
    async fn test_registered_event_extends_the_route_graph() {
        // Arrange
        let harness = route_harness();
        seed_hub(&harness.store, "Peer", 51.0);
        let new_hub = seed_hub(&harness.store, "New", 52.0);
        let event = HubEvent::Registered(HubRegistered::from_hub(&new_hub, "ops.lee"));

        // Act
        harness.handler.handle(event).await.unwrap();

        // Assert
        assert_eq!(harness.store.active_routes().len(), 2);
    }

    #[tokio::test]
    async fn test_deleted_event_retires_routes_with_the_event_actor() {
        // Arrange
        let harness = route_harness();
        let peer = seed_hub(&harness.store, "Peer", 51.0);
        let doomed = seed_hub(&harness.store, "Doomed", 52.0);
        harness
            .handler
            .handle(HubEvent::Registered(HubRegistered::from_hub(
                &doomed, "ops.lee",
            )))
            .await
            .unwrap();
        assert_eq!(harness.store.active_routes().len(), 2);

        // Act
        harness
            .handler
            .handle(HubEvent::Deleted(HubDeleted::from_hub(&doomed, "ops.kim")))
            .await
            .unwrap();

        // Assert
        assert!(harness.store.active_routes().is_empty());
        assert!(harness.store.active_routes_touching(peer.id).is_empty());
    }

    #[tokio::test]
    async fn test_updated_and_manager_changed_carry_no_route_action() {
        // Arrange
        let harness = route_harness();
        seed_hub(&harness.store, "Peer", 51.0);
        let hub = seed_hub(&harness.store, "Steady", 52.0);

        // Act
        harness
            .handler
            .handle(HubEvent::Updated(HubUpdated::from_hub(&hub, "ops.lee")))
            .await
            .unwrap();
        harness
            .handler
            .handle(HubEvent::ManagerChanged(HubManagerChanged::from_hub(
                &hub,
                Uuid::new_v4(),
                "ops.lee",
            )))
            .await
            .unwrap();

        // Assert
        assert_eq!(harness.distances.call_count(), 0);
        assert_eq!(harness.store.route_count(), 0);
    }

    #[tokio::test]
    async fn test_forwarder_publishes_under_the_event_routing_key() {
        // Arrange
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = PublishFanoutHandler::new(publisher.clone());
        let hub = Hub::register(
            "Gateway North".to_owned(),
            Address::new("1 Dock Road", None),
            Coordinate::new(51.92, 4.47),
            Uuid::new_v4(),
            &clock(),
        );

        // Act
        handler
            .handle(HubEvent::Registered(HubRegistered::from_hub(
                &hub, "ops.lee",
            )))
            .await
            .unwrap();

        // Assert
        let messages = publisher.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "registered");
        assert_eq!(messages[0].1["hubId"], serde_json::json!(hub.id));
        assert_eq!(messages[0].1["actor"], "ops.lee");
    }

    #[tokio::test]
    async fn test_forwarder_swallows_transport_failures() {
        // Arrange
        let handler = PublishFanoutHandler::new(Arc::new(FailingPublisher));
        let hub = Hub::register(
            "Gateway North".to_owned(),
            Address::new("1 Dock Road", None),
            Coordinate::new(51.92, 4.47),
            Uuid::new_v4(),
            &clock(),
        );

        // Act
        let result = handler
            .handle(HubEvent::Updated(HubUpdated::from_hub(&hub, "ops.lee")))
            .await;

        // Assert: the failure is logged, not surfaced.
        assert!(result.is_ok());
    }
}
