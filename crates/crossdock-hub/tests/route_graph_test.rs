//! Integration tests for route graph convergence under the after-commit
//! fan-out.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{TestNetwork, registration, requester, standard_leg};
use crossdock_hub::store::HubSearch;
use crossdock_test_support::{
    FailingDistanceProvider, FixedDistanceProvider, StaticMemberDirectory, StaticPermissionChecker,
    settle, wait_until,
};
use uuid::Uuid;

#[tokio::test]
async fn test_route_graph_converges_to_a_directed_complete_mesh() {
    let manager = Uuid::new_v4();
    let distances = Arc::new(FixedDistanceProvider::new(standard_leg()));
    let network = TestNetwork::build(
        StaticPermissionChecker::allow_all(),
        StaticMemberDirectory::with_members([manager]),
        distances.clone(),
    );

    // First hub: nothing to connect to, and no measurement is made.
    let first = network
        .lifecycle
        .register(
            registration("First", manager, 1.0, 1.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    wait_until("lone hub signaled", || {
        network.published_count("routeUpdated") == 1
    })
    .await;
    assert_eq!(network.store.route_count(), 0);
    assert_eq!(distances.call_count(), 0);

    // Second hub sees one peer: exactly one directed pair appears.
    let second = network
        .lifecycle
        .register(
            registration("Second", manager, 2.0, 2.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    wait_until("first pair built", || {
        network.store.active_routes().len() == 2
    })
    .await;

    // Third hub sees two peers: four more directed legs.
    let third = network
        .lifecycle
        .register(
            registration("Third", manager, 3.0, 3.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    wait_until("mesh complete", || network.store.active_routes().len() == 6).await;

    let routes = network.store.active_routes();
    let edges: HashSet<(Uuid, Uuid)> = routes
        .iter()
        .map(|route| (route.source_hub_id, route.target_hub_id))
        .collect();
    assert_eq!(edges.len(), 6);
    for a in [first.id, second.id, third.id] {
        for b in [first.id, second.id, third.id] {
            if a != b {
                assert!(edges.contains(&(a, b)), "missing directed edge");
            }
        }
    }
    assert_eq!(distances.call_count(), 6);
    assert_eq!(network.published_count("routeUpdated"), 3);

    // Every outbound view sees exactly two legs per hub.
    for hub_id in [first.id, second.id, third.id] {
        assert_eq!(network.routes.routes_from(hub_id).len(), 2);
    }
}

#[tokio::test]
async fn test_measurement_failure_aborts_batch_but_not_forwarding() {
    let manager = Uuid::new_v4();
    // Every measurement fails; registrations must still commit and
    // forward.
    let network = TestNetwork::build(
        StaticPermissionChecker::allow_all(),
        StaticMemberDirectory::with_members([manager]),
        Arc::new(FailingDistanceProvider),
    );

    let first = network
        .lifecycle
        .register(
            registration("First", manager, 1.0, 1.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    wait_until("lone hub signaled", || {
        network.published_count("routeUpdated") == 1
    })
    .await;

    let second = network
        .lifecycle
        .register(
            registration("Second", manager, 2.0, 2.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    wait_until("second registration forwarded", || {
        network.published_count("registered") == 2
    })
    .await;
    settle().await;

    // Both hubs committed; the failed batch left no partial graph and no
    // second signal.
    assert!(network.queries.find(first.id).unwrap().is_active());
    assert!(network.queries.find(second.id).unwrap().is_active());
    assert_eq!(network.store.route_count(), 0);
    assert_eq!(network.published_count("routeUpdated"), 1);
}

#[tokio::test]
async fn test_deleted_hub_is_excluded_from_later_peer_sets() {
    let manager = Uuid::new_v4();
    let network = TestNetwork::start([manager]);
    let kept = network
        .lifecycle
        .register(
            registration("Kept", manager, 1.0, 1.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    let retired = network
        .lifecycle
        .register(
            registration("Retired", manager, 2.0, 2.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    wait_until("initial pair built", || {
        network.store.active_routes().len() == 2
    })
    .await;

    network
        .lifecycle
        .delete(retired.id, "ops.audit", &requester("ops.lee"))
        .await
        .unwrap();
    wait_until("pair retired", || network.store.active_routes().is_empty()).await;

    // The retired hub's row still exists, but the next registration only
    // connects to the surviving hub.
    let newcomer = network
        .lifecycle
        .register(
            registration("Newcomer", manager, 3.0, 3.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    wait_until("newcomer connected", || {
        network.store.active_routes().len() == 2
    })
    .await;

    let routes = network.store.active_routes();
    assert!(
        routes
            .iter()
            .all(|route| route.touches(kept.id) && route.touches(newcomer.id))
    );
    assert!(routes.iter().all(|route| !route.touches(retired.id)));
}

#[tokio::test]
async fn test_query_surface_tracks_the_active_sets() {
    let manager = Uuid::new_v4();
    let network = TestNetwork::start([manager]);
    network
        .lifecycle
        .register(
            registration("Harbor South", manager, 1.0, 1.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    let depot = network
        .lifecycle
        .register(
            registration("Inland Depot", manager, 2.0, 2.0),
            &requester("ops.lee"),
        )
        .await
        .unwrap();
    wait_until("pair built", || network.store.active_routes().len() == 2).await;

    network
        .lifecycle
        .delete(depot.id, "ops.audit", &requester("ops.lee"))
        .await
        .unwrap();
    wait_until("pair retired", || network.routes.active_routes().is_empty()).await;

    assert_eq!(network.queries.find_all_active().len(), 1);
    let keyword_hits = network.queries.search(&HubSearch {
        keyword: Some("depot".to_owned()),
        include_deleted: false,
    });
    assert!(keyword_hits.is_empty());
    let audit_hits = network.queries.search(&HubSearch {
        keyword: Some("depot".to_owned()),
        include_deleted: true,
    });
    assert_eq!(audit_hits.len(), 1);
    assert_eq!(audit_hits[0].id, depot.id);
}
